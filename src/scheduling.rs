// agendalab-backend/src/scheduling.rs
//
// Núcleo de agendamento: validação de referências e verificação de
// conflitos de laboratório/professor. A decisão de conflito é uma função
// pura sobre as ocupações carregadas; o banco entra só no pré-filtro e,
// depois, como árbitro final via índices únicos (ver error_handler).

use crate::error_handler::ServiceError;
use crate::models::AulaBloco;
use crate::schema::{aula_blocos, blocos, cursos, disciplinas, laboratorios, professores};
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

/// Tupla (laboratório, professor, dia, blocos) candidata a agendamento.
#[derive(Debug, Clone)]
pub struct CandidatoAgendamento {
    pub laboratorio_id: Uuid,
    pub professor_id: Uuid,
    pub dia_semana: String,
    pub blocos: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflito {
    Laboratorio,
    Professor,
}

impl Conflito {
    pub fn mensagem(&self) -> &'static str {
        match self {
            Conflito::Laboratorio => {
                "Laboratório já está agendado para este dia da semana e horário"
            }
            Conflito::Professor => {
                "Professor já está agendado para este dia da semana e horário"
            }
        }
    }
}

/// Referências de uma aula a validar. Em updates parciais só os campos
/// presentes no payload são preenchidos.
#[derive(Debug, Default)]
pub struct ReferenciasAula {
    pub curso_id: Option<Uuid>,
    pub disciplina_id: Option<Uuid>,
    pub professor_id: Option<Uuid>,
    pub laboratorio_id: Option<Uuid>,
    pub blocos: Option<Vec<Uuid>>,
}

/// Decide se o candidato colide com as ocupações existentes.
///
/// O teste é por identidade de (dia da semana, bloco): qualquer aula
/// que compartilhe o dia e ao menos um id de bloco conflita se usar o
/// mesmo laboratório ou o mesmo professor. Não há teste geométrico de
/// horários aqui; o id do bloco é a unidade de reserva. Laboratório é
/// avaliado antes de professor e apenas o primeiro conflito é
/// reportado.
pub fn avaliar_conflito(
    ocupacoes: &[AulaBloco],
    candidato: &CandidatoAgendamento,
    exclude_id: Option<Uuid>,
) -> Option<Conflito> {
    let mut conflito_lab = false;
    let mut conflito_prof = false;

    for ocupacao in ocupacoes {
        if Some(ocupacao.aula_id) == exclude_id {
            continue;
        }
        if ocupacao.dia_semana != candidato.dia_semana
            || !candidato.blocos.contains(&ocupacao.bloco_id)
        {
            continue;
        }
        if ocupacao.laboratorio_id == candidato.laboratorio_id {
            conflito_lab = true;
        }
        if ocupacao.professor_id == candidato.professor_id {
            conflito_prof = true;
        }
    }

    if conflito_lab {
        Some(Conflito::Laboratorio)
    } else if conflito_prof {
        Some(Conflito::Professor)
    } else {
        None
    }
}

/// Carrega as ocupações que podem colidir com o candidato e aplica
/// `avaliar_conflito`. Função de decisão sem efeitos colaterais; a
/// escrita que a segue não é atômica com ela (os índices únicos de
/// aula_blocos cobrem a janela).
pub async fn verificar_conflitos(
    conn: &mut AsyncPgConnection,
    candidato: &CandidatoAgendamento,
    exclude_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    let ocupacoes = aula_blocos::table
        .filter(aula_blocos::dia_semana.eq(&candidato.dia_semana))
        .filter(aula_blocos::bloco_id.eq_any(&candidato.blocos))
        .select(AulaBloco::as_select())
        .load::<AulaBloco>(conn)
        .await
        .map_err(ServiceError::from)?;

    match avaliar_conflito(&ocupacoes, candidato, exclude_id) {
        Some(conflito) => Err(ServiceError::Conflict(conflito.mensagem().to_string())),
        None => Ok(()),
    }
}

/// Confirma que toda referência presente existe, na ordem curso →
/// disciplina → professor → laboratório → cada bloco individualmente.
/// O primeiro id ausente interrompe a verificação.
pub async fn validar_referencias(
    conn: &mut AsyncPgConnection,
    referencias: &ReferenciasAula,
) -> Result<(), ServiceError> {
    if let Some(curso_id) = referencias.curso_id {
        let existe: bool = select(exists(cursos::table.filter(cursos::id.eq(curso_id))))
            .get_result(conn)
            .await
            .map_err(ServiceError::from)?;
        if !existe {
            return Err(ServiceError::NotFound("Curso não encontrado".to_string()));
        }
    }

    if let Some(disciplina_id) = referencias.disciplina_id {
        let existe: bool = select(exists(
            disciplinas::table.filter(disciplinas::id.eq(disciplina_id)),
        ))
        .get_result(conn)
        .await
        .map_err(ServiceError::from)?;
        if !existe {
            return Err(ServiceError::NotFound(
                "Disciplina não encontrada".to_string(),
            ));
        }
    }

    if let Some(professor_id) = referencias.professor_id {
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
    }

    if let Some(laboratorio_id) = referencias.laboratorio_id {
        let existe: bool = select(exists(
            laboratorios::table.filter(laboratorios::id.eq(laboratorio_id)),
        ))
        .get_result(conn)
        .await
        .map_err(ServiceError::from)?;
        if !existe {
            return Err(ServiceError::NotFound(
                "Laboratório não encontrado".to_string(),
            ));
        }
    }

    if let Some(ids) = &referencias.blocos {
        for bloco_id in ids {
            let existe: bool = select(exists(blocos::table.filter(blocos::id.eq(bloco_id))))
                .get_result(conn)
                .await
                .map_err(ServiceError::from)?;
            if !existe {
                return Err(ServiceError::NotFound(format!(
                    "Bloco de horário {} não encontrado",
                    bloco_id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocupacao(
        aula_id: Uuid,
        bloco_id: Uuid,
        laboratorio_id: Uuid,
        professor_id: Uuid,
        dia: &str,
    ) -> AulaBloco {
        AulaBloco {
            aula_id,
            bloco_id,
            laboratorio_id,
            professor_id,
            dia_semana: dia.to_string(),
        }
    }

    fn candidato(
        laboratorio_id: Uuid,
        professor_id: Uuid,
        dia: &str,
        blocos: Vec<Uuid>,
    ) -> CandidatoAgendamento {
        CandidatoAgendamento {
            laboratorio_id,
            professor_id,
            dia_semana: dia.to_string(),
            blocos,
        }
    }

    #[test]
    fn mesmo_laboratorio_dia_e_bloco_conflita() {
        // Cenário A: mesmo lab, mesmo dia, mesmo bloco, professor diferente
        let (lab, bloco) = (Uuid::new_v4(), Uuid::new_v4());
        let existentes = [ocupacao(Uuid::new_v4(), bloco, lab, Uuid::new_v4(), "Segunda")];
        let novo = candidato(lab, Uuid::new_v4(), "Segunda", vec![bloco]);
        assert_eq!(
            avaliar_conflito(&existentes, &novo, None),
            Some(Conflito::Laboratorio)
        );
    }

    #[test]
    fn mesmo_professor_dia_e_bloco_conflita() {
        // Cenário B: mesmo professor, laboratório diferente
        let (prof, bloco) = (Uuid::new_v4(), Uuid::new_v4());
        let existentes = [ocupacao(Uuid::new_v4(), bloco, Uuid::new_v4(), prof, "Segunda")];
        let novo = candidato(Uuid::new_v4(), prof, "Segunda", vec![bloco]);
        assert_eq!(
            avaliar_conflito(&existentes, &novo, None),
            Some(Conflito::Professor)
        );
    }

    #[test]
    fn exclusao_do_proprio_id_permite_atualizar() {
        // Cenário C: a aula não conflita com o próprio estado anterior
        let (aula, lab, prof, bloco) =
            (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let existentes = [ocupacao(aula, bloco, lab, prof, "Segunda")];
        let mesmo = candidato(lab, prof, "Segunda", vec![bloco]);
        assert_eq!(avaliar_conflito(&existentes, &mesmo, Some(aula)), None);
        // sem a exclusão o mesmo candidato conflitaria
        assert!(avaliar_conflito(&existentes, &mesmo, None).is_some());
    }

    #[test]
    fn dia_diferente_ou_bloco_diferente_nao_conflita() {
        let (lab, prof, bloco) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let existentes = [ocupacao(Uuid::new_v4(), bloco, lab, prof, "Segunda")];
        let outro_dia = candidato(lab, prof, "Terça", vec![bloco]);
        assert_eq!(avaliar_conflito(&existentes, &outro_dia, None), None);
        let outro_bloco = candidato(lab, prof, "Segunda", vec![Uuid::new_v4()]);
        assert_eq!(avaliar_conflito(&existentes, &outro_bloco, None), None);
    }

    #[test]
    fn basta_um_bloco_em_comum() {
        // o teste é interseção de ids, não sobreposição geométrica
        let (lab, b1, b2) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let existentes = [ocupacao(Uuid::new_v4(), b1, lab, Uuid::new_v4(), "Quarta")];
        let novo = candidato(lab, Uuid::new_v4(), "Quarta", vec![b2, b1]);
        assert_eq!(
            avaliar_conflito(&existentes, &novo, None),
            Some(Conflito::Laboratorio)
        );
    }

    #[test]
    fn laboratorio_vence_quando_ambos_conflitam() {
        // só um tipo de conflito é reportado por chamada, lab primeiro
        let (lab, prof, bloco) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let existentes = [
            ocupacao(Uuid::new_v4(), bloco, Uuid::new_v4(), prof, "Sexta"),
            ocupacao(Uuid::new_v4(), bloco, lab, Uuid::new_v4(), "Sexta"),
        ];
        let novo = candidato(lab, prof, "Sexta", vec![bloco]);
        assert_eq!(
            avaliar_conflito(&existentes, &novo, None),
            Some(Conflito::Laboratorio)
        );
    }
}
