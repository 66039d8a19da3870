// agendalab-backend/src/handlers/disciplina_handlers.rs
use crate::db::DbPool;
use crate::error_handler::ServiceError;
use crate::handlers::parse_id;
use crate::models::{
    default_limit, default_page, CreateDisciplinaPayload, Disciplina, NewDisciplina,
    PaginatedResponse, Pagination, UpdateDisciplinaChangeset, UpdateDisciplinaPayload,
};
use crate::schema::{cursos, disciplinas, professores};
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
pub struct DisciplinaQueryParams {
    pub curso_id: Option<Uuid>,
    pub professor_id: Option<Uuid>,
    pub nome: Option<String>,
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

async fn curso_existe(conn: &mut AsyncPgConnection, curso_id: Uuid) -> Result<(), ServiceError> {
    let existe: bool = select(exists(cursos::table.filter(cursos::id.eq(curso_id))))
        .get_result(conn)
        .await
        .map_err(ServiceError::from)?;
    if !existe {
        return Err(ServiceError::NotFound("Curso não encontrado".to_string()));
    }
    Ok(())
}

async fn professor_existe(
    conn: &mut AsyncPgConnection,
    professor_id: Uuid,
) -> Result<(), ServiceError> {
    let existe: bool = select(exists(
        professores::table.filter(professores::id.eq(professor_id)),
    ))
    .get_result(conn)
    .await
    .map_err(ServiceError::from)?;
    if !existe {
        return Err(ServiceError::NotFound(
            "Professor não encontrado".to_string(),
        ));
    }
    Ok(())
}

#[post("")]
pub async fn criar_disciplina_handler(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateDisciplinaPayload>,
) -> Result<HttpResponse, ServiceError> {
    validation::requerido(&payload.nome, "Nome é obrigatório")?;
    validation::max_len(&payload.nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    validation::validar_carga_horaria(payload.carga_horaria)?;
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let mut conn = pool.get().await?;

    curso_existe(&mut conn, payload.curso_id).await?;
    if let Some(professor_id) = payload.professor_id {
        professor_existe(&mut conn, professor_id).await?;
    }

    let nova = NewDisciplina {
        curso_id: payload.curso_id,
        nome: payload.nome.clone(),
        carga_horaria: payload.carga_horaria,
        professor_id: payload.professor_id,
        status: payload.status.clone().unwrap_or_else(|| "Ativo".to_string()),
    };

    let disciplina = diesel::insert_into(disciplinas::table)
        .values(&nova)
        .get_result::<Disciplina>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Created().json(disciplina))
}

#[get("")]
pub async fn listar_disciplinas_handler(
    pool: web::Data<DbPool>,
    query: web::Query<DisciplinaQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let offset = (query.page - 1) * query.limit;

    let mut conn = pool.get().await?;

    let mut query_builder = disciplinas::table.into_boxed();
    let mut count_query = disciplinas::table.into_boxed();

    if let Some(curso_id) = query.curso_id {
        query_builder = query_builder.filter(disciplinas::curso_id.eq(curso_id));
        count_query = count_query.filter(disciplinas::curso_id.eq(curso_id));
    }

    if let Some(professor_id) = query.professor_id {
        query_builder = query_builder.filter(disciplinas::professor_id.eq(professor_id));
        count_query = count_query.filter(disciplinas::professor_id.eq(professor_id));
    }

    if let Some(nome) = &query.nome {
        let padrao = format!("%{}%", nome);
        query_builder = query_builder.filter(disciplinas::nome.ilike(padrao.clone()));
        count_query = count_query.filter(disciplinas::nome.ilike(padrao));
    }

    if let Some(status) = &query.status {
        query_builder = query_builder.filter(disciplinas::status.eq(status.clone()));
        count_query = count_query.filter(disciplinas::status.eq(status.clone()));
    }

    let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let items = query_builder
        .order(disciplinas::nome.asc())
        .limit(query.limit)
        .offset(offset)
        .select(Disciplina::as_select())
        .load::<Disciplina>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        pagination: Pagination::new(query.page, query.limit, total),
    }))
}

#[put("/{id}")]
pub async fn atualizar_disciplina_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateDisciplinaPayload>,
) -> Result<HttpResponse, ServiceError> {
    let disciplina_id = parse_id(&path.into_inner())?;

    if let Some(nome) = &payload.nome {
        validation::requerido(nome, "Nome é obrigatório")?;
        validation::max_len(nome, 100, "Nome deve ter no máximo 100 caracteres")?;
    }
    if let Some(carga) = payload.carga_horaria {
        validation::validar_carga_horaria(carga)?;
    }
    if let Some(status) = &payload.status {
        validation::validar_status(status)?;
    }

    let mut conn = pool.get().await?;

    if let Some(curso_id) = payload.curso_id {
        curso_existe(&mut conn, curso_id).await?;
    }
    if let Some(Some(professor_id)) = payload.professor_id {
        professor_existe(&mut conn, professor_id).await?;
    }

    let changes = UpdateDisciplinaChangeset {
        curso_id: payload.curso_id,
        nome: payload.nome.clone(),
        carga_horaria: payload.carga_horaria,
        professor_id: payload.professor_id,
        status: payload.status.clone(),
        updated_at: Some(Utc::now().naive_utc()),
    };

    let atualizada = diesel::update(disciplinas::table.find(disciplina_id))
        .set(&changes)
        .get_result::<Disciplina>(&mut conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    match atualizada {
        Some(disciplina) => Ok(HttpResponse::Ok().json(disciplina)),
        None => Err(ServiceError::NotFound(
            "Disciplina não encontrada".to_string(),
        )),
    }
}

#[delete("/{id}")]
pub async fn remover_disciplina_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let disciplina_id = parse_id(&path.into_inner())?;

    let mut conn = pool.get().await?;

    let removidas = diesel::delete(disciplinas::table.find(disciplina_id))
        .execute(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    if removidas > 0 {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServiceError::NotFound(
            "Disciplina não encontrada".to_string(),
        ))
    }
}
