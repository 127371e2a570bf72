//! Careers form: resume storage and application records.
//!
//! Resumes arrive base64-encoded and are written under the configured resume
//! directory as `{application_id}-{sanitized file name}`.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::db::{queries, Db};
use crate::errors::AppError;
use crate::models::{CareerApplication, StoredCareerApplication};

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Strip path separators, NUL and `..` so the name cannot leave the resume directory.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !['/', '\\', '\0'].contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .take(100)
        .collect();
    cleaned.replace("..", "").trim_start_matches('.').to_string()
}

fn has_resume_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RESUME_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

pub async fn submit_application(
    db: &Db,
    resume_dir: &Path,
    application: &CareerApplication,
) -> Result<StoredCareerApplication, AppError> {
    let resume = application.validate()?;

    let file_name = sanitize_file_name(&resume.file_name);
    if file_name.is_empty() || !has_resume_extension(&file_name) {
        return Err(AppError::Validation(
            "Please upload your resume as a PDF, DOC or DOCX file.".to_string(),
        ));
    }

    let data = BASE64
        .decode(resume.content_base64.trim())
        .map_err(|_| AppError::Validation("The resume upload could not be read.".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("The resume file is empty.".to_string()));
    }
    if data.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation("The resume must be 5 MB or smaller.".to_string()));
    }

    let id = uuid::Uuid::new_v4().to_string();
    let path: PathBuf = resume_dir.join(format!("{id}-{file_name}"));

    tokio::fs::create_dir_all(resume_dir)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create resume directory {}: {e}", resume_dir.display()))?;
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| anyhow::anyhow!("failed to write resume {}: {e}", path.display()))?;

    let stored = StoredCareerApplication {
        id,
        name: application.name.trim().to_string(),
        email: application.email.trim().to_string(),
        resume_path: path.to_string_lossy().into_owned(),
        submitted_at: chrono::Utc::now().naive_utc(),
    };

    let recorded = {
        let db = db.lock().unwrap();
        queries::create_career_application(&db, &stored)
    };
    if let Err(e) = recorded {
        if let Err(remove_err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove orphaned resume");
        }
        return Err(e.into());
    }

    tracing::info!(
        application = %stored.id,
        bytes = data.len(),
        "career application received"
    );
    Ok(stored)
}
