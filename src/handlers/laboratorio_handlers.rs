// agendalab-backend/src/handlers/laboratorio_handlers.rs
use crate::db::DbPool;
use crate::error_handler::ServiceError;
use crate::handlers::parse_id;
use crate::models::{
    default_limit, default_page, CreateLaboratorioPayload, Laboratorio, NewLaboratorio,
    PaginatedResponse, Pagination, UpdateLaboratorioChangeset, UpdateLaboratorioPayload,
};
use crate::schema::laboratorios;
use crate::validation;
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LaboratorioQueryParams {
    pub nome: Option<String>,
    pub local: Option<String>,
    pub status: Option<String>,
    pub min_capacidade: Option<i32>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[post("")]
pub async fn criar_laboratorio_handler(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateLaboratorioPayload>,
) -> Result<HttpResponse, ServiceError> {
    validation::requerido(&payload.nome, "Nome do laboratório é obrigatório")?;
    validation::max_len(&payload.nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    validation::validar_capacidade(payload.capacidade)?;
    if let Some(local) = &payload.local {
        validation::max_len(local, 200, "Local deve ter no máximo 200 caracteres")?;
    }
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let novo = NewLaboratorio {
        nome: payload.nome.clone(),
        capacidade: payload.capacidade,
        local: payload.local.clone(),
        status: payload.status.clone().unwrap_or_else(|| "Ativo".to_string()),
    };

    let mut conn = pool.get().await?;

    let laboratorio = diesel::insert_into(laboratorios::table)
        .values(&novo)
        .get_result::<Laboratorio>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Created().json(laboratorio))
}

#[get("")]
pub async fn listar_laboratorios_handler(
    pool: web::Data<DbPool>,
    query: web::Query<LaboratorioQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let offset = (query.page - 1) * query.limit;

    let mut conn = pool.get().await?;

    let mut query_builder = laboratorios::table.into_boxed();
    let mut count_query = laboratorios::table.into_boxed();

    if let Some(nome) = &query.nome {
        let padrao = format!("%{}%", nome);
        query_builder = query_builder.filter(laboratorios::nome.ilike(padrao.clone()));
        count_query = count_query.filter(laboratorios::nome.ilike(padrao));
    }

    if let Some(local) = &query.local {
        let padrao = format!("%{}%", local);
        query_builder = query_builder.filter(laboratorios::local.ilike(padrao.clone()));
        count_query = count_query.filter(laboratorios::local.ilike(padrao));
    }

    if let Some(status) = &query.status {
        query_builder = query_builder.filter(laboratorios::status.eq(status.clone()));
        count_query = count_query.filter(laboratorios::status.eq(status.clone()));
    }

    if let Some(min_capacidade) = query.min_capacidade {
        query_builder = query_builder.filter(laboratorios::capacidade.ge(min_capacidade));
        count_query = count_query.filter(laboratorios::capacidade.ge(min_capacidade));
    }

    let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let items = query_builder
        .order(laboratorios::nome.asc())
        .limit(query.limit)
        .offset(offset)
        .select(Laboratorio::as_select())
        .load::<Laboratorio>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        pagination: Pagination::new(query.page, query.limit, total),
    }))
}

#[put("/{id}")]
pub async fn atualizar_laboratorio_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateLaboratorioPayload>,
) -> Result<HttpResponse, ServiceError> {
    let laboratorio_id = parse_id(&path.into_inner())?;

    if let Some(nome) = &payload.nome {
        validation::requerido(nome, "Nome do laboratório é obrigatório")?;
        validation::max_len(nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    }
    if let Some(capacidade) = payload.capacidade {
        validation::validar_capacidade(capacidade)?;
    }
    if let Some(Some(local)) = &payload.local {
        validation::max_len(local, 200, "Local deve ter no máximo 200 caracteres")?;
    }
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let changes = UpdateLaboratorioChangeset {
        nome: payload.nome.clone(),
        capacidade: payload.capacidade,
        local: payload.local.clone(),
        status: payload.status.clone(),
        updated_at: Some(Utc::now().naive_utc()),
    };

    let mut conn = pool.get().await?;

    let atualizado = diesel::update(laboratorios::table.find(laboratorio_id))
        .set(&changes)
        .get_result::<Laboratorio>(&mut conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    match atualizado {
        Some(laboratorio) => Ok(HttpResponse::Ok().json(laboratorio)),
        None => Err(ServiceError::NotFound(
            "Laboratório não encontrado".to_string(),
        )),
    }
}

#[delete("/{id}")]
pub async fn remover_laboratorio_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let laboratorio_id = parse_id(&path.into_inner())?;

    let mut conn = pool.get().await?;

    let removidos = diesel::delete(laboratorios::table.find(laboratorio_id))
        .execute(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    if removidos > 0 {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServiceError::NotFound(
            "Laboratório não encontrado".to_string(),
        ))
    }
}
