use crate::horario;
use crate::schema::{
    aula_blocos, aulas, blocos, cursos, disciplinas, instituicoes, laboratorios, professores,
};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// --- Helpers de desserialização para campos anuláveis em updates parciais ---
// Distinguem "campo ausente" (None) de "campo presente com null" (Some(None)).

fn deserialize_opt_opt_string<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer) {
        Ok(Some(s)) => Ok(Some(Some(s))),
        Ok(None) => Ok(Some(None)), // JSON null -> Some(None)
        Err(e) => Err(e),
    }
}

fn deserialize_opt_opt_uuid<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Uuid>::deserialize(deserializer) {
        Ok(Some(u)) => Ok(Some(Some(u))),
        Ok(None) => Ok(Some(None)),
        Err(e) => Err(e),
    }
}

// --- Instituicao ---
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = instituicoes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Instituicao {
    pub id: Uuid,
    pub nome: String,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub telefone: Option<String>,
    pub ativo: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = instituicoes)]
pub struct NewInstituicao {
    pub nome: String,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub telefone: Option<String>,
    pub ativo: bool,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = instituicoes)]
pub struct UpdateInstituicaoChangeset {
    pub nome: Option<String>,
    pub cnpj: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub endereco: Option<Option<String>>,
    pub telefone: Option<Option<String>>,
    pub ativo: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

// --- Curso ---
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = cursos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Curso {
    pub id: Uuid,
    pub instituicao_id: Uuid,
    pub nome: String,
    pub turnos: Vec<String>,
    pub ativo: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = cursos)]
pub struct NewCurso {
    pub instituicao_id: Uuid,
    pub nome: String,
    pub turnos: Vec<String>,
    pub ativo: bool,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = cursos)]
pub struct UpdateCursoChangeset {
    pub instituicao_id: Option<Uuid>,
    pub nome: Option<String>,
    pub turnos: Option<Vec<String>>,
    pub ativo: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

// --- Professor ---
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = professores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = professores)]
pub struct NewProfessor {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub status: String,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = professores)]
pub struct UpdateProfessorChangeset {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<Option<String>>,
    pub status: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

// --- Disciplina ---
#[derive(
    Queryable, Selectable, Identifiable, Associations, Serialize, Deserialize, Debug, Clone,
    PartialEq,
)]
#[diesel(table_name = disciplinas)]
#[diesel(belongs_to(Curso, foreign_key = curso_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Disciplina {
    pub id: Uuid,
    pub curso_id: Uuid,
    pub nome: String,
    pub carga_horaria: i32,
    pub professor_id: Option<Uuid>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = disciplinas)]
pub struct NewDisciplina {
    pub curso_id: Uuid,
    pub nome: String,
    pub carga_horaria: i32,
    pub professor_id: Option<Uuid>,
    pub status: String,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = disciplinas)]
pub struct UpdateDisciplinaChangeset {
    pub curso_id: Option<Uuid>,
    pub nome: Option<String>,
    pub carga_horaria: Option<i32>,
    pub professor_id: Option<Option<Uuid>>,
    pub status: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

// --- Laboratorio ---
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = laboratorios)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Laboratorio {
    pub id: Uuid,
    pub nome: String,
    pub capacidade: i32,
    pub local: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = laboratorios)]
pub struct NewLaboratorio {
    pub nome: String,
    pub capacidade: i32,
    pub local: Option<String>,
    pub status: String,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = laboratorios)]
pub struct UpdateLaboratorioChangeset {
    pub nome: Option<String>,
    pub capacidade: Option<i32>,
    pub local: Option<Option<String>>,
    pub status: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

// --- Bloco de horário ---
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = blocos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Bloco {
    pub id: Uuid,
    pub turno: String,
    pub dia_semana: String,
    pub inicio: String,
    pub fim: String,
    pub ordem: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Bloco {
    /// Duração do bloco em minutos. Blocos persistidos sempre têm
    /// horários válidos com inicio < fim.
    pub fn duracao_minutos(&self) -> i32 {
        horario::duracao_minutos(&self.inicio, &self.fim).unwrap_or(0)
    }

    /// Sobreposição geométrica entre dois blocos. Turno e dia da semana
    /// particionam: se diferem, não há conflito mesmo com horários
    /// idênticos.
    pub fn tem_conflito(&self, outro: &Bloco) -> bool {
        if self.turno != outro.turno || self.dia_semana != outro.dia_semana {
            return false;
        }
        match (
            horario::parse_hora(&self.inicio),
            horario::parse_hora(&self.fim),
            horario::parse_hora(&outro.inicio),
            horario::parse_hora(&outro.fim),
        ) {
            (Some(ia), Some(fa), Some(ib), Some(fb)) => {
                horario::intervalos_sobrepoem(ia, fa, ib, fb)
            }
            _ => false,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = blocos)]
pub struct NewBloco {
    pub turno: String,
    pub dia_semana: String,
    pub inicio: String,
    pub fim: String,
    pub ordem: i32,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = blocos)]
pub struct UpdateBlocoChangeset {
    pub turno: Option<String>,
    pub dia_semana: Option<String>,
    pub inicio: Option<String>,
    pub fim: Option<String>,
    pub ordem: Option<i32>,
    pub updated_at: Option<NaiveDateTime>,
}

// --- Aula ---
// Os blocos de uma aula vivem em aula_blocos, uma linha por par
// (aula, bloco); a struct da tabela não os carrega.
#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = aulas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Aula {
    pub id: Uuid,
    pub semestre: String,
    pub curso_id: Uuid,
    pub disciplina_id: Uuid,
    pub professor_id: Uuid,
    pub laboratorio_id: Uuid,
    pub dia_semana: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = aulas)]
pub struct NewAula {
    pub semestre: String,
    pub curso_id: Uuid,
    pub disciplina_id: Uuid,
    pub professor_id: Uuid,
    pub laboratorio_id: Uuid,
    pub dia_semana: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = aulas)]
pub struct UpdateAulaChangeset {
    pub semestre: Option<String>,
    pub curso_id: Option<Uuid>,
    pub disciplina_id: Option<Uuid>,
    pub professor_id: Option<Uuid>,
    pub laboratorio_id: Option<Uuid>,
    pub dia_semana: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = aula_blocos)]
#[diesel(belongs_to(Aula))]
#[diesel(belongs_to(Bloco))]
#[diesel(primary_key(aula_id, bloco_id))]
pub struct AulaBloco {
    pub aula_id: Uuid,
    pub bloco_id: Uuid,
    pub laboratorio_id: Uuid,
    pub professor_id: Uuid,
    pub dia_semana: String,
}

// --- PAYLOAD DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstituicaoPayload {
    pub nome: String,
    pub cnpj: Option<String>,
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub telefone: Option<String>,
    pub ativo: Option<bool>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstituicaoPayload {
    pub nome: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_opt_string", default)]
    pub cnpj: Option<Option<String>>,
    #[serde(deserialize_with = "deserialize_opt_opt_string", default)]
    pub email: Option<Option<String>>,
    #[serde(deserialize_with = "deserialize_opt_opt_string", default)]
    pub endereco: Option<Option<String>>,
    #[serde(deserialize_with = "deserialize_opt_opt_string", default)]
    pub telefone: Option<Option<String>>,
    pub ativo: Option<bool>,
}

// No payload de curso o cliente envia "status": "Ativo" | "Inativo" e a
// coluna persistida é o booleano `ativo`, como no serviço original.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateCursoPayload {
    pub instituicao_id: Uuid,
    pub nome: String,
    pub turnos: Option<Vec<String>>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCursoPayload {
    pub instituicao_id: Option<Uuid>,
    pub nome: Option<String>,
    pub turnos: Option<Vec<String>>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfessorPayload {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfessorPayload {
    pub nome: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_opt_string", default)]
    pub telefone: Option<Option<String>>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateDisciplinaPayload {
    pub curso_id: Uuid,
    pub nome: String,
    pub carga_horaria: i32,
    pub professor_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDisciplinaPayload {
    pub curso_id: Option<Uuid>,
    pub nome: Option<String>,
    pub carga_horaria: Option<i32>,
    #[serde(deserialize_with = "deserialize_opt_opt_uuid", default)]
    pub professor_id: Option<Option<Uuid>>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateLaboratorioPayload {
    pub nome: String,
    pub capacidade: i32,
    pub local: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLaboratorioPayload {
    pub nome: Option<String>,
    pub capacidade: Option<i32>,
    #[serde(deserialize_with = "deserialize_opt_opt_string", default)]
    pub local: Option<Option<String>>,
    pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlocoPayload {
    pub turno: String,
    pub dia_semana: String,
    pub inicio: String,
    pub fim: String,
    pub ordem: i32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlocoPayload {
    pub turno: Option<String>,
    pub dia_semana: Option<String>,
    pub inicio: Option<String>,
    pub fim: Option<String>,
    pub ordem: Option<i32>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateAulaPayload {
    pub semestre: String,
    pub curso_id: Uuid,
    pub disciplina_id: Uuid,
    pub professor_id: Uuid,
    pub laboratorio_id: Uuid,
    pub dia_semana: String,
    pub blocos: Vec<Uuid>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAulaPayload {
    pub semestre: Option<String>,
    pub curso_id: Option<Uuid>,
    pub disciplina_id: Option<Uuid>,
    pub professor_id: Option<Uuid>,
    pub laboratorio_id: Option<Uuid>,
    pub dia_semana: Option<String>,
    pub blocos: Option<Vec<Uuid>>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

// --- Paginação ---
// Os structs de query de cada handler embutem page/limit com estes
// defaults (serde não compõe flatten em query strings).
pub fn default_page() -> i64 {
    1
}

pub fn default_limit() -> i64 {
    20
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Pagination {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Pagination {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn bloco(turno: &str, dia: &str, inicio: &str, fim: &str) -> Bloco {
        let ts = NaiveDateTime::default();
        Bloco {
            id: Uuid::new_v4(),
            turno: turno.to_string(),
            dia_semana: dia.to_string(),
            inicio: inicio.to_string(),
            fim: fim.to_string(),
            ordem: 1,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn blocos_de_turnos_ou_dias_diferentes_nunca_conflitam() {
        let a = bloco("Manhã", "Segunda", "08:00", "08:50");
        let b = bloco("Tarde", "Segunda", "08:00", "08:50");
        let c = bloco("Manhã", "Terça", "08:00", "08:50");
        assert!(!a.tem_conflito(&b));
        assert!(!a.tem_conflito(&c));
    }

    #[test]
    fn conflito_e_simetrico_e_reflexivo() {
        let a = bloco("Manhã", "Segunda", "08:00", "09:00");
        let b = bloco("Manhã", "Segunda", "08:30", "09:30");
        assert!(a.tem_conflito(&b));
        assert_eq!(a.tem_conflito(&b), b.tem_conflito(&a));
        assert!(a.tem_conflito(&a));
    }

    #[test]
    fn blocos_consecutivos_nao_conflitam() {
        let a = bloco("Manhã", "Segunda", "08:00", "08:50");
        let b = bloco("Manhã", "Segunda", "08:50", "09:40");
        assert!(!a.tem_conflito(&b));
    }

    #[test]
    fn duracao_em_minutos() {
        assert_eq!(bloco("Manhã", "Segunda", "08:00", "08:50").duracao_minutos(), 50);
    }

    #[test]
    fn paginacao_arredonda_para_cima() {
        assert_eq!(Pagination::new(1, 20, 0).pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).pages, 2);
    }
}
