// agendalab-backend/src/handlers/instituicao_handlers.rs
use crate::db::DbPool;
use crate::error_handler::ServiceError;
use crate::handlers::parse_id;
use crate::models::{
    default_limit, default_page, CreateInstituicaoPayload, Instituicao, NewInstituicao,
    PaginatedResponse, Pagination, UpdateInstituicaoChangeset, UpdateInstituicaoPayload,
};
use crate::schema::instituicoes;
use crate::validation;
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct InstituicaoQueryParams {
    pub ativo: Option<bool>,
    pub nome: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[post("")]
pub async fn criar_instituicao_handler(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateInstituicaoPayload>,
) -> Result<HttpResponse, ServiceError> {
    validation::requerido(&payload.nome, "Nome é obrigatório")?;
    validation::max_len(&payload.nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    if let Some(email) = &payload.email {
        validation::validar_email(email)?;
    }

    let nova = NewInstituicao {
        nome: payload.nome.clone(),
        cnpj: payload.cnpj.clone(),
        email: payload.email.clone(),
        endereco: payload.endereco.clone(),
        telefone: payload.telefone.clone(),
        ativo: payload.ativo.unwrap_or(true),
    };

    let mut conn = pool.get().await?;

    let instituicao = diesel::insert_into(instituicoes::table)
        .values(&nova)
        .get_result::<Instituicao>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Created().json(instituicao))
}

#[get("")]
pub async fn listar_instituicoes_handler(
    pool: web::Data<DbPool>,
    query: web::Query<InstituicaoQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let offset = (query.page - 1) * query.limit;

    let mut conn = pool.get().await?;

    let mut query_builder = instituicoes::table.into_boxed();
    let mut count_query = instituicoes::table.into_boxed();

    if let Some(flag) = query.ativo {
        query_builder = query_builder.filter(instituicoes::ativo.eq(flag));
        count_query = count_query.filter(instituicoes::ativo.eq(flag));
    }

    if let Some(nome) = &query.nome {
        let padrao = format!("%{}%", nome);
        query_builder = query_builder.filter(instituicoes::nome.ilike(padrao.clone()));
        count_query = count_query.filter(instituicoes::nome.ilike(padrao));
    }

    let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let items = query_builder
        .order(instituicoes::nome.asc())
        .limit(query.limit)
        .offset(offset)
        .select(Instituicao::as_select())
        .load::<Instituicao>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        pagination: Pagination::new(query.page, query.limit, total),
    }))
}

#[put("/{id}")]
pub async fn atualizar_instituicao_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateInstituicaoPayload>,
) -> Result<HttpResponse, ServiceError> {
    let instituicao_id = parse_id(&path.into_inner())?;

    if let Some(nome) = &payload.nome {
        validation::requerido(nome, "Nome é obrigatório")?;
        validation::max_len(nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    }
    if let Some(Some(email)) = &payload.email {
        validation::validar_email(email)?;
    }

    let changes = UpdateInstituicaoChangeset {
        nome: payload.nome.clone(),
        cnpj: payload.cnpj.clone(),
        email: payload.email.clone(),
        endereco: payload.endereco.clone(),
        telefone: payload.telefone.clone(),
        ativo: payload.ativo,
        updated_at: Some(Utc::now().naive_utc()),
    };

    let mut conn = pool.get().await?;

    let atualizada = diesel::update(instituicoes::table.find(instituicao_id))
        .set(&changes)
        .get_result::<Instituicao>(&mut conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    match atualizada {
        Some(instituicao) => Ok(HttpResponse::Ok().json(instituicao)),
        None => Err(ServiceError::NotFound(
            "Instituição não encontrada".to_string(),
        )),
    }
}

#[delete("/{id}")]
pub async fn remover_instituicao_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let instituicao_id = parse_id(&path.into_inner())?;

    let mut conn = pool.get().await?;

    let removidas = diesel::delete(instituicoes::table.find(instituicao_id))
        .execute(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    if removidas > 0 {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServiceError::NotFound(
            "Instituição não encontrada".to_string(),
        ))
    }
}
