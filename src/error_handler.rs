// agendalab-backend/src/error_handler.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::bb8::RunError as BB8RunError;
use diesel_async::pooled_connection::PoolError;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    InternalServerError(String),
    /// Campo malformado ou regra de dado violada. O corpo sai como
    /// `{"message": "Dados inválidos", "details": ...}`.
    Validation(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    DatabaseError(String),
    PoolError(String),
}

impl ServiceError {
    fn from_diesel_error(error: DieselError) -> ServiceError {
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                // Índices únicos são o árbitro final de agendamentos
                // concorrentes: quem perde a corrida cai aqui e recebe o
                // mesmo 409 que o pré-check teria devolvido.
                let message = match info.constraint_name() {
                    Some("unique_lab_dia_bloco") => {
                        "Laboratório já está agendado para este dia da semana e horário"
                    }
                    Some("unique_prof_dia_bloco") => {
                        "Professor já está agendado para este dia da semana e horário"
                    }
                    Some("unique_turno_dia_ordem") => {
                        "Já existe um bloco com este turno, dia da semana e ordem"
                    }
                    Some("unique_professor_email") => "Email já cadastrado para outro professor",
                    _ => "Registro duplicado",
                };
                log::warn!(
                    "Unique violation on {:?}: {}",
                    info.constraint_name(),
                    info.message()
                );
                ServiceError::Conflict(message.to_string())
            }
            DieselError::DatabaseError(kind, info) => {
                let detailed_message =
                    format!("Database error: {:?} - Info: {}", kind, info.message());
                log::error!("Internal Database Error: {}", detailed_message);
                ServiceError::DatabaseError("A database operation failed.".to_string())
            }
            DieselError::NotFound => {
                ServiceError::NotFound("Registro não encontrado".to_string())
            }
            err => {
                log::error!("Unexpected Diesel error: {}", err);
                ServiceError::DatabaseError("An unexpected database error occurred.".to_string())
            }
        }
    }

    fn from_pool_error(error: PoolError) -> ServiceError {
        log::error!("Pool error: {:?}", error);
        ServiceError::PoolError("Could not connect to the database pool.".to_string())
    }

    fn from_bb8_run_error(error: BB8RunError) -> ServiceError {
        log::error!("BB8 connection pool error: {:?}", error);
        ServiceError::PoolError("Could not obtain connection from database pool.".to_string())
    }
}

impl From<DieselError> for ServiceError {
    fn from(error: DieselError) -> ServiceError {
        ServiceError::from_diesel_error(error)
    }
}

impl From<PoolError> for ServiceError {
    fn from(error: PoolError) -> ServiceError {
        ServiceError::from_pool_error(error)
    }
}

impl From<BB8RunError> for ServiceError {
    fn from(error: BB8RunError) -> ServiceError {
        ServiceError::from_bb8_run_error(error)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            ServiceError::Validation(msg) => write!(f, "Dados inválidos: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "{}", msg),
            ServiceError::NotFound(msg) => write!(f, "{}", msg),
            ServiceError::Conflict(msg) => write!(f, "{}", msg),
            ServiceError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            ServiceError::PoolError(msg) => write!(f, "Pool Error: {}", msg),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match *self {
            ServiceError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::PoolError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Corpo de erro da API: { message, details? }. Erros 5xx nunca
        // expõem o detalhe interno, só o log o recebe.
        let body = match self {
            ServiceError::Validation(details) => json!({
                "message": "Dados inválidos",
                "details": details,
            }),
            ServiceError::BadRequest(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::Conflict(msg) => json!({ "message": msg }),
            ServiceError::InternalServerError(_)
            | ServiceError::DatabaseError(_)
            | ServiceError::PoolError(_) => json!({ "message": "Erro interno do servidor" }),
        };

        if status_code.is_server_error() {
            log::error!("Responding with server error ({}): {}", status_code, self);
        } else {
            log::warn!("Responding with client error ({}): {}", status_code, self);
        }

        HttpResponse::build(status_code).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_por_variante() {
        assert_eq!(
            ServiceError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::DatabaseError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_do_diesel_vira_404() {
        let err = ServiceError::from(DieselError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
