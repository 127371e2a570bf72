//! Canned answers for the assistants.
//!
//! Rules are checked in order against the lower-cased message and the first
//! rule with a matching keyword wins. Matching is plain substring search, so
//! "hi" also fires inside "this"; order is the only tie-break.

use serde::Serialize;

use crate::models::Channel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    About,
    Booking,
    Services,
    AiSolutions,
    Portfolio,
    Pricing,
    Contact,
    Experience,
    Greeting,
    Fallback,
}

pub struct FaqRule {
    pub topic: Topic,
    pub keywords: Vec<String>,
}

impl FaqRule {
    fn new(topic: Topic, keywords: &[&str]) -> Self {
        Self {
            topic,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, lower_message: &str) -> bool {
        self.keywords.iter().any(|k| lower_message.contains(k.as_str()))
    }
}

/// Business details substituted into the canned answers.
#[derive(Debug, Clone)]
pub struct BusinessProfile {
    pub name: String,
    pub contact_email: String,
    pub website: String,
}

impl BusinessProfile {
    pub fn from_config(config: &crate::config::AppConfig) -> Self {
        Self {
            name: config.business_name.clone(),
            contact_email: config.contact_email.clone(),
            website: config.business_website.clone(),
        }
    }
}

pub struct FaqBook {
    profile: BusinessProfile,
    rules: Vec<FaqRule>,
}

impl FaqBook {
    pub fn new(profile: BusinessProfile) -> Self {
        let what_is = format!("what is {}", profile.name.to_lowercase());
        let rules = vec![
            FaqRule::new(
                Topic::About,
                &["about", "company", "who are you", &what_is, "tell me about"],
            ),
            FaqRule::new(
                Topic::Booking,
                &["appointment", "book", "schedule", "meeting", "consultation"],
            ),
            FaqRule::new(
                Topic::Services,
                &["service", "what do you do", "what services", "offer"],
            ),
            FaqRule::new(
                Topic::AiSolutions,
                &["ai agent", "ai workflow", "artificial intelligence"],
            ),
            FaqRule::new(Topic::Portfolio, &["project", "portfolio", "work", "example"]),
            FaqRule::new(Topic::Pricing, &["price", "cost", "how much", "pricing"]),
            FaqRule::new(
                Topic::Contact,
                &["contact", "email", "phone", "reach", "address"],
            ),
            FaqRule::new(
                Topic::Experience,
                &["experience", "expertise", "years", "how long"],
            ),
            FaqRule::new(Topic::Greeting, &["hello", "hi", "help", "what can you do"]),
        ];
        Self { profile, rules }
    }

    pub fn profile(&self) -> &BusinessProfile {
        &self.profile
    }

    pub fn dispatch(&self, message: &str) -> Topic {
        let lower = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.topic)
            .unwrap_or(Topic::Fallback)
    }

    pub fn greeting(&self, channel: Channel) -> String {
        let name = &self.profile.name;
        match channel {
            Channel::Chat => format!(
                "Hello! I'm {name}'s AI assistant. I can help you learn about our company, book appointments, answer questions about our AI services, or provide information about AI agents and workflows. How can I assist you today?"
            ),
            Channel::Voice => format!(
                "Hello! I'm {name}'s voice assistant. I can help you learn about our company, book appointments, or answer questions about our AI services. Say 'tell me about {name}', or 'book appointment' to get started."
            ),
        }
    }

    /// Apology used whenever the booking collaborator fails.
    pub fn booking_failed(&self, channel: Channel) -> String {
        match channel {
            Channel::Chat => format!(
                "I'm sorry, there was an error booking your appointment. Please try again or contact us directly at {}",
                self.profile.contact_email
            ),
            Channel::Voice => format!(
                "I'm sorry, there was an error booking your appointment. Please try again, or email us at {}.",
                self.profile.contact_email
            ),
        }
    }

    pub fn answer(&self, topic: Topic, channel: Channel, message: &str) -> String {
        match channel {
            Channel::Chat => self.chat_answer(topic, message),
            Channel::Voice => self.voice_answer(topic),
        }
    }

    fn chat_answer(&self, topic: Topic, message: &str) -> String {
        let BusinessProfile {
            name,
            contact_email,
            website,
        } = &self.profile;
        match topic {
            Topic::About => format!(
                "{name} is an AI solutions agency specializing in AI agents and intelligent workflows. We've been transforming businesses for over 5 years with:\n\n\
                 **Our Stats:**\n• 500+ Satisfied Clients\n• 150+ Projects Completed\n• 25+ Countries Served\n• 5+ Years of Experience\n\n\
                 **Our Mission:**\nTo empower businesses with intelligent AI agents and automated workflows that drive growth and innovation.\n\n\
                 Would you like to know more about our services or book a consultation?"
            ),
            Topic::Booking => "I'd be happy to help you book an appointment! Let me gather some information. What's your name?".to_string(),
            Topic::Services => "We specialize in AI agents and workflows! Here are our core services:\n\n\
                 **AI Agents & Workflows:**\n• AI Voice Assistants\n• AI Image Generation\n• AI Video Generation\n• AI Chatbots\n• AI Workflow Automation\n• AI Content Generation\n• AI Data Analysis\n• AI Document Processing\n\n\
                 **Additional Services:**\n• Web Development\n• Mobile App Development\n• Backend & DevOps\n• SaaS Platforms\n• Digital Marketing\n\n\
                 Would you like to know more about any specific service?".to_string(),
            Topic::AiSolutions => "AI Agents and Workflows are our specialty!\n\n\
                 **AI Agents:**\nCustom-built agents that automate workflows, from voice assistants to creative content generation.\n\n\
                 **AI Workflow Automation:**\nAgents that streamline business processes, reduce manual work and increase efficiency.\n\n\
                 **Results:**\n• 60% cost reduction (Voice Assistants)\n• 1000+ images/day (Image Generation)\n• 90% time reduction (Video Creation)\n• 500+ tasks automated (Workflow Automation)\n\n\
                 Would you like to see examples of our AI projects or book a consultation?".to_string(),
            Topic::Portfolio => "We've completed 150+ successful projects! A few examples:\n\n\
                 • **AI Voice Assistant** - 60% cost reduction for customer service\n• **AI Image Generation** - 1000+ images/day\n• **AI Video Creation** - 90% time reduction\n• **AI Workflow Automation** - 500+ daily tasks automated\n• **AI Customer Support** - 80% auto-resolution rate\n• **AI Document Processing** - 99% accuracy\n\n\
                 Would you like to see our full portfolio or discuss a project for your business?".to_string(),
            Topic::Pricing => "Pricing varies based on project complexity and requirements:\n\n\
                 • Competitive pricing for new clients\n• Transparent estimates with detailed breakdowns\n• Flexible payment options\n• Custom quotes for AI projects\n\n\
                 You can use our Project Estimate Calculator at /estimate for an instant quote, or I can book a free consultation to discuss your needs.\n\n\
                 Would you like to calculate an estimate or schedule a consultation?".to_string(),
            Topic::Contact => format!(
                "You can reach us through multiple channels:\n\n\
                 **Email:** {contact_email}\n**Phone:** Available upon request\n**Website:** {website}\n**Chat:** I'm here 24/7 to help!\n\n\
                 We typically respond within 24 hours. For urgent matters, book an appointment and we'll prioritize your request.\n\n\
                 Would you like to book an appointment to discuss your project?"
            ),
            Topic::Experience => format!(
                "{name} has been building AI solutions for over 5 years:\n\n\
                 • 500+ Satisfied Clients\n• 150+ Projects Completed\n• 25+ Countries Served\n\n\
                 **Expertise:** AI agent development, workflow automation, machine learning, natural language processing, computer vision, full-stack development and cloud infrastructure.\n\n\
                 Would you like to know more about our capabilities or see case studies?"
            ),
            Topic::Greeting => format!(
                "Hello! I'm here to help you learn about {name} and our AI solutions. I can:\n\n\
                 • Tell you about our company and services\n• Explain our AI agents and workflows\n• Show you examples of our work\n• Help you book an appointment\n• Provide pricing information\n\n\
                 Just ask me anything, for example \"Book an appointment\". How can I assist you today?"
            ),
            Topic::Fallback => format!(
                "I understand you're asking about: {message}. I can help you with information about {name}, our AI services, booking appointments, or pricing. Could you provide more details, or would you like me to tell you about our company and services?"
            ),
        }
    }

    fn voice_answer(&self, topic: Topic) -> String {
        let BusinessProfile {
            name,
            contact_email,
            ..
        } = &self.profile;
        match topic {
            Topic::About => format!(
                "{name} is an AI solutions agency, specializing in AI agents and intelligent workflows. We've been transforming businesses for over 5 years, with 500 plus satisfied clients, and 150 plus projects completed across 25 plus countries. Would you like to know more about our services, or book a consultation?"
            ),
            Topic::Booking => "I'd be happy to help you book an appointment. Let's start with your name. Please tell me your full name.".to_string(),
            Topic::Services => "We specialize in AI agents and workflows. Our services include AI voice assistants, AI image and video generation, AI workflow automation, AI chatbots, and custom AI agent development. We also offer web development, mobile apps, and digital marketing. Would you like to know more about any specific service?".to_string(),
            Topic::AiSolutions => "AI agents and workflows are our specialty. We build custom agents that automate business processes, from voice assistants to image and video generation. Would you like to book a consultation?".to_string(),
            Topic::Portfolio => "We've completed over 150 projects, including a voice assistant that cut customer service costs by 60 percent, and workflow automation handling 500 tasks a day. Would you like to discuss a project for your business?".to_string(),
            Topic::Pricing => "Pricing depends on the complexity of your project. You can get an instant quote from our estimate calculator, or I can book a free consultation for you. Which would you prefer?".to_string(),
            Topic::Contact => format!(
                "You can email us at {contact_email}. We typically respond within 24 hours. Would you like to book an appointment instead?"
            ),
            Topic::Experience => format!(
                "{name} has over 5 years of experience, with more than 500 satisfied clients in over 25 countries. Would you like to hear about our capabilities?"
            ),
            Topic::Greeting => format!(
                "Hello! I can tell you about {name}, our services and pricing, or book an appointment for you. What would you like to do?"
            ),
            Topic::Fallback => "I'm sorry, I didn't understand that. Could you please repeat, or say 'book appointment' to schedule a meeting?".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> FaqBook {
        FaqBook::new(BusinessProfile {
            name: "Acme Studio".to_string(),
            contact_email: "hello@acme.test".to_string(),
            website: "acme.test".to_string(),
        })
    }

    #[test]
    fn test_about_wins_over_appointment() {
        let topic = book().dispatch("Tell me about your appointment booking services");
        assert_eq!(topic, Topic::About);
    }

    #[test]
    fn test_booking_phrases() {
        let faq = book();
        assert_eq!(faq.dispatch("book an appointment"), Topic::Booking);
        assert_eq!(faq.dispatch("Can we SCHEDULE a call?"), Topic::Booking);
        assert_eq!(faq.dispatch("I'd like a consultation"), Topic::Booking);
    }

    #[test]
    fn test_rule_order() {
        let faq = book();
        assert_eq!(faq.dispatch("what services do you offer"), Topic::Services);
        assert_eq!(faq.dispatch("tell me more on artificial intelligence"), Topic::AiSolutions);
        assert_eq!(faq.dispatch("show me your portfolio"), Topic::Portfolio);
        assert_eq!(faq.dispatch("how much does it cost"), Topic::Pricing);
        assert_eq!(faq.dispatch("what's your email"), Topic::Contact);
        assert_eq!(faq.dispatch("how long have you been around"), Topic::Experience);
        assert_eq!(faq.dispatch("hello"), Topic::Greeting);
        assert_eq!(faq.dispatch("qwerty"), Topic::Fallback);
    }

    #[test]
    fn test_substring_matching_is_literal() {
        // "this" contains "hi"
        assert_eq!(book().dispatch("is this real"), Topic::Greeting);
    }

    #[test]
    fn test_business_name_rule() {
        assert_eq!(book().dispatch("What is Acme Studio?"), Topic::About);
    }

    #[test]
    fn test_answers_use_profile() {
        let faq = book();
        let contact = faq.answer(Topic::Contact, Channel::Chat, "email?");
        assert!(contact.contains("hello@acme.test"));
        let fallback = faq.answer(Topic::Fallback, Channel::Chat, "qwerty");
        assert!(fallback.contains("qwerty"));
        assert!(faq.booking_failed(Channel::Voice).contains("hello@acme.test"));
        assert!(faq.greeting(Channel::Voice).contains("Acme Studio"));
    }
}
