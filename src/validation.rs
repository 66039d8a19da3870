// agendalab-backend/src/validation.rs
//
// Validações de payload, executadas antes de qualquer I/O. As mensagens
// são as mesmas que o serviço sempre devolveu aos clientes.

use crate::error_handler::ServiceError;
use crate::horario::{self, DiaSemana, Turno};
use chrono::NaiveDate;
use uuid::Uuid;

fn invalido(msg: &str) -> ServiceError {
    ServiceError::Validation(msg.to_string())
}

pub fn requerido(valor: &str, mensagem: &str) -> Result<(), ServiceError> {
    if valor.trim().is_empty() {
        return Err(invalido(mensagem));
    }
    Ok(())
}

pub fn max_len(valor: &str, max: usize, mensagem: &str) -> Result<(), ServiceError> {
    if valor.chars().count() > max {
        return Err(invalido(mensagem));
    }
    Ok(())
}

pub fn validar_turno(turno: &str) -> Result<(), ServiceError> {
    Turno::parse(turno)
        .map(|_| ())
        .ok_or_else(|| invalido("Turno deve ser: Manhã, Tarde, Noite ou Integral"))
}

pub fn validar_dia_semana(dia: &str) -> Result<(), ServiceError> {
    DiaSemana::parse(dia).map(|_| ()).ok_or_else(|| {
        invalido(
            "Dia da semana deve ser: Segunda, Terça, Quarta, Quinta, Sexta, Sábado ou Domingo",
        )
    })
}

pub fn validar_status(status: &str) -> Result<(), ServiceError> {
    match status {
        "Ativo" | "Inativo" => Ok(()),
        _ => Err(invalido("Status deve ser: Ativo ou Inativo")),
    }
}

pub fn validar_email(email: &str) -> Result<(), ServiceError> {
    // Forma mínima: local@dominio.tld, sem espaços
    let valido = match email.split_once('@') {
        Some((local, dominio)) => {
            !local.is_empty()
                && dominio.contains('.')
                && !dominio.starts_with('.')
                && !dominio.ends_with('.')
                && !email.contains(char::is_whitespace)
                && !dominio.contains('@')
        }
        None => false,
    };
    if !valido {
        return Err(invalido("Email deve ter um formato válido"));
    }
    Ok(())
}

pub fn validar_hora(hora: &str, mensagem: &str) -> Result<(), ServiceError> {
    if !horario::hora_valida(hora) {
        return Err(invalido(mensagem));
    }
    Ok(())
}

/// Invariante de intervalo do bloco: inicio < fim em minutos.
pub fn validar_intervalo_horario(inicio: &str, fim: &str) -> Result<(), ServiceError> {
    let i = horario::parse_hora(inicio)
        .ok_or_else(|| invalido("Horário de início deve estar no formato HH:mm"))?;
    let f = horario::parse_hora(fim)
        .ok_or_else(|| invalido("Horário de fim deve estar no formato HH:mm"))?;
    if i >= f {
        return Err(invalido(
            "Horário de início deve ser anterior ao horário de fim",
        ));
    }
    Ok(())
}

pub fn validar_ordem(ordem: i32) -> Result<(), ServiceError> {
    if ordem < 1 {
        return Err(invalido("Ordem deve ser um número positivo"));
    }
    Ok(())
}

pub fn validar_carga_horaria(carga: i32) -> Result<(), ServiceError> {
    if carga < 1 {
        return Err(invalido("Carga horária deve ser um número inteiro positivo"));
    }
    Ok(())
}

pub fn validar_capacidade(capacidade: i32) -> Result<(), ServiceError> {
    if capacidade < 1 {
        return Err(invalido("Capacidade deve ser no mínimo 1"));
    }
    Ok(())
}

pub fn validar_blocos_nao_vazio(blocos: &[Uuid]) -> Result<(), ServiceError> {
    if blocos.is_empty() {
        return Err(invalido(
            "Pelo menos um bloco de horário deve ser selecionado",
        ));
    }
    Ok(())
}

pub fn validar_periodo(data_inicio: NaiveDate, data_fim: NaiveDate) -> Result<(), ServiceError> {
    if data_inicio > data_fim {
        return Err(invalido(
            "Data de fim deve ser posterior ou igual à data de início",
        ));
    }
    Ok(())
}

pub fn validar_turnos(turnos: &[String]) -> Result<(), ServiceError> {
    for turno in turnos {
        validar_turno(turno)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detalhe(err: ServiceError) -> String {
        match err {
            ServiceError::Validation(d) => d,
            other => panic!("esperava Validation, veio {:?}", other),
        }
    }

    #[test]
    fn intervalo_invertido_e_rejeitado() {
        let err = validar_intervalo_horario("09:00", "08:00").unwrap_err();
        assert_eq!(
            detalhe(err),
            "Horário de início deve ser anterior ao horário de fim"
        );
        // inicio == fim também é inválido
        assert!(validar_intervalo_horario("08:00", "08:00").is_err());
        assert!(validar_intervalo_horario("08:00", "08:50").is_ok());
    }

    #[test]
    fn hora_malformada_e_rejeitada_antes_da_comparacao() {
        assert!(validar_intervalo_horario("8h00", "09:00").is_err());
        assert!(validar_intervalo_horario("08:00", "25:00").is_err());
    }

    #[test]
    fn blocos_vazios_sao_rejeitados() {
        let err = validar_blocos_nao_vazio(&[]).unwrap_err();
        assert_eq!(
            detalhe(err),
            "Pelo menos um bloco de horário deve ser selecionado"
        );
        assert!(validar_blocos_nao_vazio(&[Uuid::new_v4()]).is_ok());
    }

    #[test]
    fn periodo_invertido_e_rejeitado() {
        let inicio = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let fim = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert!(validar_periodo(inicio, fim).is_err());
        assert!(validar_periodo(inicio, inicio).is_ok());
    }

    #[test]
    fn emails() {
        assert!(validar_email("ana.souza@ifpe.edu.br").is_ok());
        for ruim in ["", "sem-arroba", "@dominio.com", "a@b", "a b@c.d", "a@.com"] {
            assert!(validar_email(ruim).is_err(), "deveria rejeitar {:?}", ruim);
        }
    }

    #[test]
    fn enums_de_dominio() {
        assert!(validar_turno("Integral").is_ok());
        assert!(validar_turno("integral").is_err());
        assert!(validar_dia_semana("Sábado").is_ok());
        assert!(validar_dia_semana("Sabado").is_err());
        assert!(validar_status("Inativo").is_ok());
        assert!(validar_status("Pausado").is_err());
        assert!(validar_ordem(0).is_err());
        assert!(validar_ordem(1).is_ok());
    }
}
