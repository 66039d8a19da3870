// agendalab-backend/src/main.rs
mod db;
mod error_handler;
mod handlers;
mod horario;
mod models;
mod read_model;
mod scheduling;
pub mod schema;
mod validation;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use db::DbPool;
use std::env;

async fn health_check_handler(
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, error_handler::ServiceError> {
    match pool.get().await {
        Ok(_conn) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "message": "Backend is running and DB pool accessible"
        }))),
        Err(e) => {
            log::error!("Failed to get connection from pool: {:?}", e);
            Err(error_handler::ServiceError::InternalServerError(
                "Failed to check DB pool".to_string(),
            ))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    if cfg!(debug_assertions) {
        match dotenvy::dotenv() {
            Ok(path) => log::info!(".env file loaded from path: {}", path.display()),
            Err(e) => log::warn!(
                "Could not load .env file: {}, using environment variables.",
                e
            ),
        }
    }

    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in environment variables or .env file");

    let pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database connection pool.");

    log::info!("AgendaLab Backend Service starting...");

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid number");

    log::info!("Server will start at http://{}:{}", host, port);

    HttpServer::new(move || {
        // API aberta, como o serviço original: CORS permissivo
        let cors = Cors::permissive();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(pool.clone()))
            .service(web::resource("/health").route(web::get().to(health_check_handler)))
            .service(
                web::scope("/api/v1/instituicoes")
                    .service(handlers::instituicao_handlers::criar_instituicao_handler)
                    .service(handlers::instituicao_handlers::listar_instituicoes_handler)
                    .service(handlers::instituicao_handlers::atualizar_instituicao_handler)
                    .service(handlers::instituicao_handlers::remover_instituicao_handler),
            )
            .service(
                web::scope("/api/v1/cursos")
                    .service(handlers::curso_handlers::criar_curso_handler)
                    .service(handlers::curso_handlers::listar_cursos_handler)
                    .service(handlers::curso_handlers::atualizar_curso_handler)
                    .service(handlers::curso_handlers::remover_curso_handler),
            )
            .service(
                web::scope("/api/v1/professores")
                    .service(handlers::professor_handlers::criar_professor_handler)
                    .service(handlers::professor_handlers::listar_professores_handler)
                    .service(handlers::professor_handlers::atualizar_professor_handler)
                    .service(handlers::professor_handlers::remover_professor_handler),
            )
            .service(
                web::scope("/api/v1/disciplinas")
                    .service(handlers::disciplina_handlers::criar_disciplina_handler)
                    .service(handlers::disciplina_handlers::listar_disciplinas_handler)
                    .service(handlers::disciplina_handlers::atualizar_disciplina_handler)
                    .service(handlers::disciplina_handlers::remover_disciplina_handler),
            )
            .service(
                web::scope("/api/v1/laboratorios")
                    .service(handlers::laboratorio_handlers::criar_laboratorio_handler)
                    .service(handlers::laboratorio_handlers::listar_laboratorios_handler)
                    .service(handlers::laboratorio_handlers::atualizar_laboratorio_handler)
                    .service(handlers::laboratorio_handlers::remover_laboratorio_handler),
            )
            .service(
                web::scope("/api/v1/blocos")
                    .service(handlers::bloco_handlers::criar_bloco_handler)
                    .service(handlers::bloco_handlers::listar_blocos_handler)
                    .service(handlers::bloco_handlers::atualizar_bloco_handler)
                    .service(handlers::bloco_handlers::remover_bloco_handler),
            )
            .service(
                web::scope("/api/v1/aulas")
                    .service(handlers::aula_handlers::criar_aula_handler)
                    .service(handlers::aula_handlers::listar_aulas_handler)
                    .service(handlers::aula_handlers::atualizar_aula_handler)
                    .service(handlers::aula_handlers::remover_aula_handler),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
