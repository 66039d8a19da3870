// agendalab-backend/src/handlers/bloco_handlers.rs
use crate::db::DbPool;
use crate::error_handler::ServiceError;
use crate::handlers::parse_id;
use crate::models::{
    default_limit, default_page, Bloco, CreateBlocoPayload, NewBloco, PaginatedResponse,
    Pagination, UpdateBlocoChangeset, UpdateBlocoPayload,
};
use crate::schema::blocos;
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
pub struct BlocoQueryParams {
    pub turno: Option<String>,
    pub dia_semana: Option<String>,
    pub ordem: Option<i32>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Pré-check da chave natural (turno, dia, ordem). O índice único
/// unique_turno_dia_ordem cobre a janela entre o check e a escrita.
async fn chave_duplicada(
    conn: &mut AsyncPgConnection,
    turno: &str,
    dia_semana: &str,
    ordem: i32,
    exclude_id: Option<Uuid>,
) -> Result<bool, ServiceError> {
    let filtro = blocos::table
        .filter(blocos::turno.eq(turno))
        .filter(blocos::dia_semana.eq(dia_semana))
        .filter(blocos::ordem.eq(ordem));
    let resultado = match exclude_id {
        Some(id) => {
            select(exists(filtro.filter(blocos::id.ne(id))))
                .get_result(conn)
                .await
        }
        None => select(exists(filtro)).get_result(conn).await,
    };
    resultado.map_err(ServiceError::from)
}

#[post("")]
pub async fn criar_bloco_handler(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateBlocoPayload>,
) -> Result<HttpResponse, ServiceError> {
    validation::validar_turno(&payload.turno)?;
    validation::validar_dia_semana(&payload.dia_semana)?;
    validation::validar_hora(
        &payload.inicio,
        "Horário de início deve estar no formato HH:mm",
    )?;
    validation::validar_hora(&payload.fim, "Horário de fim deve estar no formato HH:mm")?;
    validation::validar_intervalo_horario(&payload.inicio, &payload.fim)?;
    validation::validar_ordem(payload.ordem)?;

    let mut conn = pool.get().await?;

    if chave_duplicada(
        &mut conn,
        &payload.turno,
        &payload.dia_semana,
        payload.ordem,
        None,
    )
    .await?
    {
        return Err(ServiceError::Conflict(
            "Já existe um bloco com este turno, dia da semana e ordem".to_string(),
        ));
    }

    let novo = NewBloco {
        turno: payload.turno.clone(),
        dia_semana: payload.dia_semana.clone(),
        inicio: payload.inicio.clone(),
        fim: payload.fim.clone(),
        ordem: payload.ordem,
    };

    let bloco = diesel::insert_into(blocos::table)
        .values(&novo)
        .get_result::<Bloco>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Created().json(bloco))
}

#[get("")]
pub async fn listar_blocos_handler(
    pool: web::Data<DbPool>,
    query: web::Query<BlocoQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let offset = (query.page - 1) * query.limit;

    let mut conn = pool.get().await?;

    let mut query_builder = blocos::table.into_boxed();
    let mut count_query = blocos::table.into_boxed();

    if let Some(turno) = &query.turno {
        query_builder = query_builder.filter(blocos::turno.eq(turno.clone()));
        count_query = count_query.filter(blocos::turno.eq(turno.clone()));
    }

    if let Some(dia_semana) = &query.dia_semana {
        query_builder = query_builder.filter(blocos::dia_semana.eq(dia_semana.clone()));
        count_query = count_query.filter(blocos::dia_semana.eq(dia_semana.clone()));
    }

    if let Some(ordem) = query.ordem {
        query_builder = query_builder.filter(blocos::ordem.eq(ordem));
        count_query = count_query.filter(blocos::ordem.eq(ordem));
    }

    let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let items = query_builder
        .order((
            blocos::turno.asc(),
            blocos::dia_semana.asc(),
            blocos::ordem.asc(),
        ))
        .limit(query.limit)
        .offset(offset)
        .select(Bloco::as_select())
        .load::<Bloco>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        pagination: Pagination::new(query.page, query.limit, total),
    }))
}

#[put("/{id}")]
pub async fn atualizar_bloco_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateBlocoPayload>,
) -> Result<HttpResponse, ServiceError> {
    let bloco_id = parse_id(&path.into_inner())?;

    if let Some(turno) = &payload.turno {
        validation::validar_turno(turno)?;
    }
    if let Some(dia_semana) = &payload.dia_semana {
        validation::validar_dia_semana(dia_semana)?;
    }
    if let Some(inicio) = &payload.inicio {
        validation::validar_hora(inicio, "Horário de início deve estar no formato HH:mm")?;
    }
    if let Some(fim) = &payload.fim {
        validation::validar_hora(fim, "Horário de fim deve estar no formato HH:mm")?;
    }
    if let Some(ordem) = payload.ordem {
        validation::validar_ordem(ordem)?;
    }

    let mut conn = pool.get().await?;

    let atual = blocos::table
        .find(bloco_id)
        .select(Bloco::as_select())
        .first::<Bloco>(&mut conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    let atual = match atual {
        Some(bloco) => bloco,
        None => return Err(ServiceError::NotFound("Bloco não encontrado".to_string())),
    };

    // Os invariantes valem para o estado resultante do merge, não só
    // para os campos enviados.
    let inicio = payload.inicio.as_deref().unwrap_or(&atual.inicio);
    let fim = payload.fim.as_deref().unwrap_or(&atual.fim);
    validation::validar_intervalo_horario(inicio, fim)?;

    if payload.turno.is_some() || payload.dia_semana.is_some() || payload.ordem.is_some() {
        let turno = payload.turno.as_deref().unwrap_or(&atual.turno);
        let dia_semana = payload.dia_semana.as_deref().unwrap_or(&atual.dia_semana);
        let ordem = payload.ordem.unwrap_or(atual.ordem);
        if chave_duplicada(&mut conn, turno, dia_semana, ordem, Some(bloco_id)).await? {
            return Err(ServiceError::Conflict(
                "Já existe um bloco com este turno, dia da semana e ordem".to_string(),
            ));
        }
    }

    let changes = UpdateBlocoChangeset {
        turno: payload.turno.clone(),
        dia_semana: payload.dia_semana.clone(),
        inicio: payload.inicio.clone(),
        fim: payload.fim.clone(),
        ordem: payload.ordem,
        updated_at: Some(Utc::now().naive_utc()),
    };

    let atualizado = diesel::update(blocos::table.find(bloco_id))
        .set(&changes)
        .get_result::<Bloco>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(HttpResponse::Ok().json(atualizado))
}

#[delete("/{id}")]
pub async fn remover_bloco_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let bloco_id = parse_id(&path.into_inner())?;

    let mut conn = pool.get().await?;

    let removidos = diesel::delete(blocos::table.find(bloco_id))
        .execute(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    if removidos > 0 {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServiceError::NotFound("Bloco não encontrado".to_string()))
    }
}
