// agendalab-backend/src/handlers/professor_handlers.rs
use crate::db::DbPool;
use crate::error_handler::ServiceError;
use crate::handlers::parse_id;
use crate::models::{
    default_limit, default_page, CreateProfessorPayload, NewProfessor, PaginatedResponse,
    Pagination, Professor, UpdateProfessorChangeset, UpdateProfessorPayload,
};
use crate::schema::professores;
use crate::validation;
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct ProfessorQueryParams {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Pré-check de email duplicado. O índice único em professores.email
/// cobre a janela entre o check e a escrita.
async fn email_em_uso(
    conn: &mut AsyncPgConnection,
    email: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, ServiceError> {
    let resultado = match exclude_id {
        Some(id) => {
            select(exists(
                professores::table
                    .filter(professores::email.eq(email))
                    .filter(professores::id.ne(id)),
            ))
            .get_result(conn)
            .await
        }
        None => {
            select(exists(professores::table.filter(professores::email.eq(email))))
                .get_result(conn)
                .await
        }
    };
    resultado.map_err(ServiceError::from)
}

#[post("")]
pub async fn criar_professor_handler(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateProfessorPayload>,
) -> Result<HttpResponse, ServiceError> {
    validation::requerido(&payload.nome, "Nome é obrigatório")?;
    validation::max_len(&payload.nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    validation::requerido(&payload.email, "Email é obrigatório")?;
    validation::validar_email(&payload.email)?;
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let email = payload.email.trim().to_lowercase();

    let mut conn = pool.get().await?;

    if email_em_uso(&mut conn, &email, None).await? {
        return Err(ServiceError::Conflict(
            "Email já cadastrado para outro professor".to_string(),
        ));
    }

    let novo = NewProfessor {
        nome: payload.nome.clone(),
        email,
        telefone: payload.telefone.clone(),
        status: payload.status.clone().unwrap_or_else(|| "Ativo".to_string()),
    };

    let professor = diesel::insert_into(professores::table)
        .values(&novo)
        .get_result::<Professor>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Created().json(professor))
}

#[get("")]
pub async fn listar_professores_handler(
    pool: web::Data<DbPool>,
    query: web::Query<ProfessorQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let offset = (query.page - 1) * query.limit;

    let mut conn = pool.get().await?;

    let mut query_builder = professores::table.into_boxed();
    let mut count_query = professores::table.into_boxed();

    if let Some(nome) = &query.nome {
        let padrao = format!("%{}%", nome);
        query_builder = query_builder.filter(professores::nome.ilike(padrao.clone()));
        count_query = count_query.filter(professores::nome.ilike(padrao));
    }

    if let Some(email) = &query.email {
        let padrao = format!("%{}%", email);
        query_builder = query_builder.filter(professores::email.ilike(padrao.clone()));
        count_query = count_query.filter(professores::email.ilike(padrao));
    }

    if let Some(status) = &query.status {
        query_builder = query_builder.filter(professores::status.eq(status.clone()));
        count_query = count_query.filter(professores::status.eq(status.clone()));
    }

    let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let items = query_builder
        .order(professores::nome.asc())
        .limit(query.limit)
        .offset(offset)
        .select(Professor::as_select())
        .load::<Professor>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        pagination: Pagination::new(query.page, query.limit, total),
    }))
}

#[put("/{id}")]
pub async fn atualizar_professor_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateProfessorPayload>,
) -> Result<HttpResponse, ServiceError> {
    let professor_id = parse_id(&path.into_inner())?;

    if let Some(nome) = &payload.nome {
        validation::requerido(nome, "Nome é obrigatório")?;
        validation::max_len(nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    }
    if let Some(email) = &payload.email {
        validation::validar_email(email)?;
    }
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let email = payload.email.as_ref().map(|e| e.trim().to_lowercase());

    let mut conn = pool.get().await?;

    if let Some(email) = &email {
        if email_em_uso(&mut conn, email, Some(professor_id)).await? {
            return Err(ServiceError::Conflict(
                "Email já cadastrado para outro professor".to_string(),
            ));
        }
    }

    let changes = UpdateProfessorChangeset {
        nome: payload.nome.clone(),
        email,
        telefone: payload.telefone.clone(),
        status: payload.status.clone(),
        updated_at: Some(Utc::now().naive_utc()),
    };

    let atualizado = diesel::update(professores::table.find(professor_id))
        .set(&changes)
        .get_result::<Professor>(&mut conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    match atualizado {
        Some(professor) => Ok(HttpResponse::Ok().json(professor)),
        None => Err(ServiceError::NotFound(
            "Professor não encontrado".to_string(),
        )),
    }
}

#[delete("/{id}")]
pub async fn remover_professor_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let professor_id = parse_id(&path.into_inner())?;

    let mut conn = pool.get().await?;

    let removidos = diesel::delete(professores::table.find(professor_id))
        .execute(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    if removidos > 0 {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServiceError::NotFound(
            "Professor não encontrado".to_string(),
        ))
    }
}
