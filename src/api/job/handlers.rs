use std::collections::HashMap;

use actix_web::{
    HttpResponse, Responder, get, patch, post,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::job::models::{BulkStatusPayload, UpdateDetailsPayload, UpdateStatusPayload};
use crate::api::job::service::{JobService, ServiceError};
use crate::query::FilterCriteria;

/// Paginated, filtered job listing. Malformed filter parameters are never an
/// error; they degrade to "filter not applied".
#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    params: Query<HashMap<String, String>>,
) -> Result<impl Responder, ServiceError> {
    let criteria = FilterCriteria::from_query(&params);
    let response = service.list_jobs(&criteria).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Single-job detail view: the row projection plus the validated analysis
/// document. Unknown ids are a 404.
#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    id: Path<String>,
) -> Result<impl Responder, ServiceError> {
    let response = service.get_job(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/bulk-status")]
async fn bulk_update_status(
    service: Data<JobService>,
    payload: Json<BulkStatusPayload>,
) -> Result<impl Responder, ServiceError> {
    let response = service.bulk_set_status(&payload).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/{id}/status")]
async fn update_status(
    service: Data<JobService>,
    id: Path<String>,
    payload: Json<UpdateStatusPayload>,
) -> Result<impl Responder, ServiceError> {
    let response = service.set_status(&id, payload.status).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[patch("/{id}")]
async fn update_details(
    service: Data<JobService>,
    id: Path<String>,
    payload: Json<UpdateDetailsPayload>,
) -> Result<impl Responder, ServiceError> {
    let response = service.update_details(&id, &payload).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn job_config(config: &mut ServiceConfig) {
    // `/{id}/status` must register before `/{id}`.
    config.service(
        scope("jobs")
            .service(list_jobs)
            .service(bulk_update_status)
            .service(get_job)
            .service(update_status)
            .service(update_details),
    );
}
