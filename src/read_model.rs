// agendalab-backend/src/read_model.rs
//
// Expansão de referências para exibição. Só leitura: o verificador de
// conflitos nunca passa por aqui.

use crate::error_handler::ServiceError;
use crate::models::{Aula, Bloco};
use crate::schema::{aula_blocos, blocos, cursos, disciplinas, laboratorios, professores};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use uuid::Uuid;

/// Resumo de uma referência expandida: id + nome. `nome` fica nulo se o
/// registro referenciado tiver sido removido (não há cascata).
#[derive(Serialize, Debug, Clone)]
pub struct RefResumo {
    pub id: Uuid,
    pub nome: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AulaApiResponse {
    pub id: Uuid,
    pub semestre: String,
    pub curso: RefResumo,
    pub disciplina: RefResumo,
    pub professor: RefResumo,
    pub laboratorio: RefResumo,
    pub dia_semana: String,
    pub blocos: Vec<Bloco>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Monta a resposta de uma aula com referências expandidas.
pub async fn montar_aula_response(
    conn: &mut AsyncPgConnection,
    aula: Aula,
) -> Result<AulaApiResponse, ServiceError> {
    let nome_curso = cursos::table
        .find(aula.curso_id)
        .select(cursos::nome)
        .first::<String>(conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    let nome_disciplina = disciplinas::table
        .find(aula.disciplina_id)
        .select(disciplinas::nome)
        .first::<String>(conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    let nome_professor = professores::table
        .find(aula.professor_id)
        .select(professores::nome)
        .first::<String>(conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    let nome_laboratorio = laboratorios::table
        .find(aula.laboratorio_id)
        .select(laboratorios::nome)
        .first::<String>(conn)
        .await
        .optional()
        .map_err(ServiceError::from)?;

    let blocos_da_aula = aula_blocos::table
        .filter(aula_blocos::aula_id.eq(aula.id))
        .inner_join(blocos::table.on(blocos::id.eq(aula_blocos::bloco_id)))
        .order(blocos::ordem.asc())
        .select(Bloco::as_select())
        .load::<Bloco>(conn)
        .await
        .map_err(ServiceError::from)?;

    Ok(AulaApiResponse {
        id: aula.id,
        semestre: aula.semestre,
        curso: RefResumo {
            id: aula.curso_id,
            nome: nome_curso,
        },
        disciplina: RefResumo {
            id: aula.disciplina_id,
            nome: nome_disciplina,
        },
        professor: RefResumo {
            id: aula.professor_id,
            nome: nome_professor,
        },
        laboratorio: RefResumo {
            id: aula.laboratorio_id,
            nome: nome_laboratorio,
        },
        dia_semana: aula.dia_semana,
        blocos: blocos_da_aula,
        data_inicio: aula.data_inicio,
        data_fim: aula.data_fim,
        created_at: aula.created_at,
        updated_at: aula.updated_at,
    })
}
