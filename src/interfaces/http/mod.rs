use crate::application::use_cases::upload_scoring::UploadScoringUseCase;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::response::respond;
use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub use_case: Arc<UploadScoringUseCase>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
    pub strict_status_codes: bool,
    pub max_upload_bytes: usize,
}

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

#[get("/")]
async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({"Hello": "World"}))
}

#[post("/file")]
async fn upload_file(data: web::Data<HttpState>, payload: Multipart) -> impl Responder {
    let result = match read_upload(payload, data.max_upload_bytes).await {
        Ok(upload) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Previewing {} ({} bytes)", upload.filename, upload.bytes.len()),
            );
            data.use_case.preview(&upload.filename, &upload.bytes)
        }
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        add_log(&data.logs, "ERROR", "HttpApi", &format!("File preview failed: {}", e));
    }
    respond(result, data.strict_status_codes)
}

#[post("/predict")]
async fn predict(data: web::Data<HttpState>, payload: Multipart) -> impl Responder {
    let result = match read_upload(payload, data.max_upload_bytes).await {
        Ok(upload) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Scoring {} ({} bytes)", upload.filename, upload.bytes.len()),
            );
            data.use_case.score(&upload.filename, &upload.bytes).await
        }
        Err(e) => Err(e),
    };

    match &result {
        Ok(scored) => add_log(
            &data.logs,
            "INFO",
            "HttpApi",
            &format!("Scored {} rows from {}", scored.results.len(), scored.filename),
        ),
        Err(e) => add_log(&data.logs, "ERROR", "HttpApi", &format!("Prediction failed: {}", e)),
    }
    respond(result, data.strict_status_codes)
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    HttpResponse::Ok().json(&*logs)
}

/// Read the first field that carries a filename
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<UploadedFile> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::DecodeError(format!("Invalid multipart upload: {}", e)))?
    {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let Some(filename) = filename else {
            continue;
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::DecodeError(format!("Invalid multipart upload: {}", e)))?
        {
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::DecodeError(format!(
                    "File exceeds the {} byte upload limit",
                    limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(UploadedFile { filename, bytes });
    }

    Err(AppError::DecodeError("No file found in upload".to_string()))
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }
    add_log_entry(logs, level, source, message);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root)
        .service(upload_file)
        .service(predict)
        .service(get_logs);
}

pub fn start_server(state: HttpState, bind: (String, u16)) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Front-end is served from another origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run();

    Ok(server)
}
