// agendalab-backend/src/handlers/aula_handlers.rs
//
// Orquestração do ciclo de vida da aula: validação de payload, depois
// referências, depois conflitos, e só então a escrita, em transação
// junto com as linhas de reserva de aula_blocos.
use crate::db::DbPool;
use crate::error_handler::ServiceError;
use crate::handlers::parse_id;
use crate::models::{
    default_limit, default_page, Aula, AulaBloco, CreateAulaPayload, NewAula, PaginatedResponse,
    Pagination, UpdateAulaChangeset, UpdateAulaPayload,
};
use crate::read_model::montar_aula_response;
use crate::scheduling::{self, CandidatoAgendamento, ReferenciasAula};
use crate::schema::{aula_blocos, aulas};
use crate::validation;
use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AulaQueryParams {
    pub professor_id: Option<Uuid>,
    pub laboratorio_id: Option<Uuid>,
    pub dia_semana: Option<String>,
    pub semestre: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn linhas_de_reserva(aula: &Aula, blocos: &[Uuid]) -> Vec<AulaBloco> {
    blocos
        .iter()
        .map(|bloco_id| AulaBloco {
            aula_id: aula.id,
            bloco_id: *bloco_id,
            laboratorio_id: aula.laboratorio_id,
            professor_id: aula.professor_id,
            dia_semana: aula.dia_semana.clone(),
        })
        .collect()
}

#[post("")]
pub async fn criar_aula_handler(
    pool: web::Data<DbPool>,
    payload: web::Json<CreateAulaPayload>,
) -> Result<HttpResponse, ServiceError> {
    validation::requerido(&payload.semestre, "Semestre é obrigatório")?;
    validation::max_len(
        &payload.semestre,
        10,
        "Semestre deve ter no máximo 10 caracteres",
    )?;
    validation::validar_dia_semana(&payload.dia_semana)?;
    validation::validar_blocos_nao_vazio(&payload.blocos)?;
    validation::validar_periodo(payload.data_inicio, payload.data_fim)?;

    let mut conn = pool.get().await?;

    let referencias = ReferenciasAula {
        curso_id: Some(payload.curso_id),
        disciplina_id: Some(payload.disciplina_id),
        professor_id: Some(payload.professor_id),
        laboratorio_id: Some(payload.laboratorio_id),
        blocos: Some(payload.blocos.clone()),
    };
    scheduling::validar_referencias(&mut conn, &referencias).await?;

    let candidato = CandidatoAgendamento {
        laboratorio_id: payload.laboratorio_id,
        professor_id: payload.professor_id,
        dia_semana: payload.dia_semana.clone(),
        blocos: payload.blocos.clone(),
    };
    scheduling::verificar_conflitos(&mut conn, &candidato, None).await?;

    let nova = NewAula {
        semestre: payload.semestre.clone(),
        curso_id: payload.curso_id,
        disciplina_id: payload.disciplina_id,
        professor_id: payload.professor_id,
        laboratorio_id: payload.laboratorio_id,
        dia_semana: payload.dia_semana.clone(),
        data_inicio: payload.data_inicio,
        data_fim: payload.data_fim,
    };
    let blocos_ids = payload.blocos.clone();

    // Aula e linhas de reserva entram juntas; um concorrente que passou
    // pelo pré-check perde aqui no índice único e recebe 409.
    let aula = conn
        .transaction::<Aula, ServiceError, _>(|conn| {
            async move {
                let aula: Aula = diesel::insert_into(aulas::table)
                    .values(&nova)
                    .get_result(conn)
                    .await?;
                let linhas = linhas_de_reserva(&aula, &blocos_ids);
                diesel::insert_into(aula_blocos::table)
                    .values(&linhas)
                    .execute(conn)
                    .await?;
                Ok(aula)
            }
            .scope_boxed()
        })
        .await?;

    let resposta = montar_aula_response(&mut conn, aula).await?;
    Ok(HttpResponse::Created().json(resposta))
}

#[get("")]
pub async fn listar_aulas_handler(
    pool: web::Data<DbPool>,
    query: web::Query<AulaQueryParams>,
) -> Result<HttpResponse, ServiceError> {
    let offset = (query.page - 1) * query.limit;

    let mut conn = pool.get().await?;

    let mut query_builder = aulas::table.into_boxed();
    let mut count_query = aulas::table.into_boxed();

    if let Some(professor_id) = query.professor_id {
        query_builder = query_builder.filter(aulas::professor_id.eq(professor_id));
        count_query = count_query.filter(aulas::professor_id.eq(professor_id));
    }

    if let Some(laboratorio_id) = query.laboratorio_id {
        query_builder = query_builder.filter(aulas::laboratorio_id.eq(laboratorio_id));
        count_query = count_query.filter(aulas::laboratorio_id.eq(laboratorio_id));
    }

    if let Some(dia_semana) = &query.dia_semana {
        query_builder = query_builder.filter(aulas::dia_semana.eq(dia_semana.clone()));
        count_query = count_query.filter(aulas::dia_semana.eq(dia_semana.clone()));
    }

    if let Some(semestre) = &query.semestre {
        query_builder = query_builder.filter(aulas::semestre.eq(semestre.clone()));
        count_query = count_query.filter(aulas::semestre.eq(semestre.clone()));
    }

    let total = count_query
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let aulas_pagina = query_builder
        .order((aulas::data_inicio.asc(), aulas::dia_semana.asc()))
        .limit(query.limit)
        .offset(offset)
        .select(Aula::as_select())
        .load::<Aula>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let mut items = Vec::with_capacity(aulas_pagina.len());
    for aula in aulas_pagina {
        items.push(montar_aula_response(&mut conn, aula).await?);
    }

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        items,
        pagination: Pagination::new(query.page, query.limit, total),
    }))
}

#[put("/{id}")]
pub async fn atualizar_aula_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateAulaPayload>,
) -> Result<HttpResponse, ServiceError> {
    let aula_id = parse_id(&path.into_inner())?;

    if let Some(semestre) = &payload.semestre {
        validation::requerido(semestre, "Semestre é obrigatório")?;
        validation::max_len(semestre, 10, "Semestre deve ter no máximo 10 caracteres")?;
    }
    if let Some(dia_semana) = &payload.dia_semana {
        validation::validar_dia_semana(dia_semana)?;
    }
    if let Some(blocos) = &payload.blocos {
        validation::validar_blocos_nao_vazio(blocos)?;
    }

    let mut conn = pool.get().await?;

    let existente = aulas::table
        .find(aula_id)
        .select(Aula::as_select())
        .first::<Aula>(&mut conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    let existente = match existente {
        Some(aula) => aula,
        None => return Err(ServiceError::NotFound("Aula não encontrada".to_string())),
    };

    // O período resultante do merge precisa continuar válido
    let data_inicio = payload.data_inicio.unwrap_or(existente.data_inicio);
    let data_fim = payload.data_fim.unwrap_or(existente.data_fim);
    validation::validar_periodo(data_inicio, data_fim)?;

    // Referências: só os campos presentes no payload
    let referencias = ReferenciasAula {
        curso_id: payload.curso_id,
        disciplina_id: payload.disciplina_id,
        professor_id: payload.professor_id,
        laboratorio_id: payload.laboratorio_id,
        blocos: payload.blocos.clone(),
    };
    scheduling::validar_referencias(&mut conn, &referencias).await?;

    let blocos_atuais: Vec<Uuid> = aula_blocos::table
        .filter(aula_blocos::aula_id.eq(aula_id))
        .select(aula_blocos::bloco_id)
        .load::<Uuid>(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    let merged = CandidatoAgendamento {
        laboratorio_id: payload.laboratorio_id.unwrap_or(existente.laboratorio_id),
        professor_id: payload.professor_id.unwrap_or(existente.professor_id),
        dia_semana: payload
            .dia_semana
            .clone()
            .unwrap_or_else(|| existente.dia_semana.clone()),
        blocos: payload.blocos.clone().unwrap_or_else(|| blocos_atuais.clone()),
    };

    // Reconferir conflitos apenas se algum campo relevante mudou,
    // excluindo a própria aula da verificação
    let recheck = payload.laboratorio_id.is_some()
        || payload.professor_id.is_some()
        || payload.dia_semana.is_some()
        || payload.blocos.is_some();
    if recheck {
        scheduling::verificar_conflitos(&mut conn, &merged, Some(aula_id)).await?;
    }

    let changes = UpdateAulaChangeset {
        semestre: payload.semestre.clone(),
        curso_id: payload.curso_id,
        disciplina_id: payload.disciplina_id,
        professor_id: payload.professor_id,
        laboratorio_id: payload.laboratorio_id,
        dia_semana: payload.dia_semana.clone(),
        data_inicio: payload.data_inicio,
        data_fim: payload.data_fim,
        updated_at: Some(Utc::now().naive_utc()),
    };

    let aula = conn
        .transaction::<Aula, ServiceError, _>(|conn| {
            async move {
                let aula: Aula = diesel::update(aulas::table.find(aula_id))
                    .set(&changes)
                    .get_result(conn)
                    .await?;
                // As linhas de reserva são reescritas a partir do estado
                // mesclado para manter as colunas desnormalizadas em dia
                diesel::delete(aula_blocos::table.filter(aula_blocos::aula_id.eq(aula_id)))
                    .execute(conn)
                    .await?;
                let linhas = linhas_de_reserva(&aula, &merged.blocos);
                diesel::insert_into(aula_blocos::table)
                    .values(&linhas)
                    .execute(conn)
                    .await?;
                Ok(aula)
            }
            .scope_boxed()
        })
        .await?;

    let resposta = montar_aula_response(&mut conn, aula).await?;
    Ok(HttpResponse::Ok().json(resposta))
}

#[delete("/{id}")]
pub async fn remover_aula_handler(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let aula_id = parse_id(&path.into_inner())?;

    let mut conn = pool.get().await?;

    // As linhas de aula_blocos caem por ON DELETE CASCADE
    let removidas = diesel::delete(aulas::table.find(aula_id))
        .execute(&mut conn)
        .await
        .map_err(ServiceError::from)?;

    if removidas > 0 {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ServiceError::NotFound("Aula não encontrada".to_string()))
    }
}
