// agendalab-backend/src/handlers/curso_handlers.rs
use crate::db::DbPool;
use crate::error_handler::ServiceError;
use crate::handlers::parse_id;
use crate::models::{
    default_limit, default_page, CreateCursoPayload, Curso, NewCurso, PaginatedResponse,
    Pagination, UpdateCursoChangeset, UpdateCursoPayload,
};
use crate::schema::{cursos, instituicoes};
use crate::validation;
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CursoQueryParams {
    pub instituicao_id: Option<Uuid>,
    pub nome: Option<String>,
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

async fn instituicao_existe(
    conn: &mut AsyncPgConnection,
    instituicao_id: Uuid,
) -> Result<(), ServiceError> {
    let existe: bool = select(exists(
        instituicoes::table.filter(instituicoes::id.eq(instituicao_id)),
    ))
    .get_result(conn)
    .await
    .map_err(ServiceError::from)?;
    if !existe {
        return Err(ServiceError::NotFound(
            "Instituição não encontrada".to_string(),
        ));
    }
    Ok(())
}

#[post("")]
pub async fn criar_curso_handler(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateCursoPayload>,
) -> Result<HttpResponse, ServiceError> {
    validation::requerido(&payload.nome, "Nome é obrigatório")?;
    validation::max_len(&payload.nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    if let Some(turnos) = &payload.turnos {
        validation::validar_turnos(turnos)?;
    }
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let mut conn = pool.get().await?;
    instituicao_existe(&mut conn, payload.instituicao_id).await?;

    // "status" do payload vira o booleano `ativo`, default Ativo
    let novo = NewCurso {
        instituicao_id: payload.instituicao_id,
        nome: payload.nome.clone(),
        turnos: payload.turnos.clone().unwrap_or_default(),
        ativo: payload.status.as_deref().map_or(true, |s| s == "Ativo"),
    };

    let curso = diesel::insert_into(cursos::table)
        .values(&novo)
        .get_result::<Curso>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Created().json(curso))
}

#[get("")]
pub async fn listar_cursos_handler(
    pool: web::Data<DbPool>,
    query: web::Query<CursoQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let offset = (query.page - 1) * query.limit;

    let mut conn = pool.get().await?;

    let mut query_builder = cursos::table.into_boxed();
    let mut count_query = cursos::table.into_boxed();

    if let Some(instituicao_id) = query.instituicao_id {
        query_builder = query_builder.filter(cursos::instituicao_id.eq(instituicao_id));
        count_query = count_query.filter(cursos::instituicao_id.eq(instituicao_id));
    }

    if let Some(nome) = &query.nome {
        let padrao = format!("%{}%", nome);
        query_builder = query_builder.filter(cursos::nome.ilike(padrao.clone()));
        count_query = count_query.filter(cursos::nome.ilike(padrao));
    }

    if let Some(status) = &query.status {
        let flag = status == "Ativo";
        query_builder = query_builder.filter(cursos::ativo.eq(flag));
        count_query = count_query.filter(cursos::ativo.eq(flag));
    }

    let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let items = query_builder
        .order(cursos::created_at.desc())
        .limit(query.limit)
        .offset(offset)
        .select(Curso::as_select())
        .load::<Curso>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        pagination: Pagination::new(query.page, query.limit, total),
    }))
}

#[put("/{id}")]
pub async fn atualizar_curso_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateCursoPayload>,
) -> Result<HttpResponse, ServiceError> {
    let curso_id = parse_id(&path.into_inner())?;

    if let Some(nome) = &payload.nome {
        validation::requerido(nome, "Nome é obrigatório")?;
        validation::max_len(nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    }
    if let Some(turnos) = &payload.turnos {
        validation::validar_turnos(turnos)?;
    }
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let mut conn = pool.get().await?;

    if let Some(instituicao_id) = payload.instituicao_id {
        instituicao_existe(&mut conn, instituicao_id).await?;
    }

    let changes = UpdateCursoChangeset {
        instituicao_id: payload.instituicao_id,
        nome: payload.nome.clone(),
        turnos: payload.turnos.clone(),
        ativo: payload.status.as_deref().map(|s| s == "Ativo"),
        updated_at: Some(Utc::now().naive_utc()),
    };

    let atualizado = diesel::update(cursos::table.find(curso_id))
        .set(&changes)
        .get_result::<Curso>(&mut conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    match atualizado {
        Some(curso) => Ok(HttpResponse::Ok().json(curso)),
        None => Err(ServiceError::NotFound("Curso não encontrado".to_string())),
    }
}

#[delete("/{id}")]
pub async fn remover_curso_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let curso_id = parse_id(&path.into_inner())?;

    let mut conn = pool.get().await?;

    let removidos = diesel::delete(cursos::table.find(curso_id))
        .execute(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    if removidos > 0 {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServiceError::NotFound("Curso não encontrado".to_string()))
    }
}
