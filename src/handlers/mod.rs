// agendalab-backend/src/handlers/mod.rs
pub mod aula_handlers;
pub mod bloco_handlers;
pub mod curso_handlers;
pub mod disciplina_handlers;
pub mod instituicao_handlers;
pub mod laboratorio_handlers;
pub mod professor_handlers;

use crate::error_handler::ServiceError;
use uuid::Uuid;

/// Ids chegam como segmento de path; formato inválido é 400, não 404.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::BadRequest("ID inválido".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_malformado_vira_bad_request() {
        assert!(parse_id("123e4567-e89b-12d3-a456-426614174000").is_ok());
        assert!(matches!(
            parse_id("nao-e-uuid"),
            Err(ServiceError::BadRequest(_))
        ));
    }
}
