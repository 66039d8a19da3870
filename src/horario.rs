// agendalab-backend/src/horario.rs
//
// Modelo puro de horários: turnos, dias da semana e aritmética de
// minutos sobre strings "HH:mm". Nenhum I/O aqui.

/// Turno do dia. O turno particiona os blocos: blocos de turnos
/// diferentes nunca se sobrepõem, mesmo com horários idênticos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turno {
    Manha,
    Tarde,
    Noite,
    Integral,
}

impl Turno {
    pub const VALORES: [Turno; 4] = [Turno::Manha, Turno::Tarde, Turno::Noite, Turno::Integral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Turno::Manha => "Manhã",
            Turno::Tarde => "Tarde",
            Turno::Noite => "Noite",
            Turno::Integral => "Integral",
        }
    }

    pub fn parse(s: &str) -> Option<Turno> {
        Turno::VALORES.into_iter().find(|t| t.as_str() == s)
    }
}

/// Dia da semana, com os nomes canônicos usados na API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaSemana {
    Segunda,
    Terca,
    Quarta,
    Quinta,
    Sexta,
    Sabado,
    Domingo,
}

impl DiaSemana {
    pub const VALORES: [DiaSemana; 7] = [
        DiaSemana::Segunda,
        DiaSemana::Terca,
        DiaSemana::Quarta,
        DiaSemana::Quinta,
        DiaSemana::Sexta,
        DiaSemana::Sabado,
        DiaSemana::Domingo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiaSemana::Segunda => "Segunda",
            DiaSemana::Terca => "Terça",
            DiaSemana::Quarta => "Quarta",
            DiaSemana::Quinta => "Quinta",
            DiaSemana::Sexta => "Sexta",
            DiaSemana::Sabado => "Sábado",
            DiaSemana::Domingo => "Domingo",
        }
    }

    pub fn parse(s: &str) -> Option<DiaSemana> {
        DiaSemana::VALORES.into_iter().find(|d| d.as_str() == s)
    }
}

/// Converte "HH:mm" em minutos desde meia-noite. Aceita exatamente o que
/// o padrão `^([01]?[0-9]|2[0-3]):[0-5][0-9]$` aceita: hora 0-23 com um
/// ou dois dígitos, minutos sempre com dois dígitos.
pub fn parse_hora(s: &str) -> Option<i32> {
    let (h, m) = s.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hora: i32 = h.parse().ok()?;
    let minuto: i32 = m.parse().ok()?;
    if hora > 23 || minuto > 59 {
        return None;
    }
    Some(hora * 60 + minuto)
}

pub fn hora_valida(s: &str) -> bool {
    parse_hora(s).is_some()
}

/// Duração `fim - inicio` em minutos. `None` se algum horário for
/// inválido.
pub fn duracao_minutos(inicio: &str, fim: &str) -> Option<i32> {
    Some(parse_hora(fim)? - parse_hora(inicio)?)
}

/// Teste de sobreposição de intervalos semiabertos, em minutos.
pub fn intervalos_sobrepoem(inicio_a: i32, fim_a: i32, inicio_b: i32, fim_b: i32) -> bool {
    !(fim_a <= inicio_b || fim_b <= inicio_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hora_aceita_formatos_do_padrao() {
        assert_eq!(parse_hora("08:00"), Some(480));
        assert_eq!(parse_hora("8:00"), Some(480));
        assert_eq!(parse_hora("23:59"), Some(1439));
        assert_eq!(parse_hora("0:00"), Some(0));
    }

    #[test]
    fn parse_hora_rejeita_malformados() {
        for s in ["24:00", "12:60", "12:5", "1200", "ab:cd", "12:005", ":30", "12:", ""] {
            assert_eq!(parse_hora(s), None, "deveria rejeitar {:?}", s);
        }
    }

    #[test]
    fn duracao_de_bloco_de_cinquenta_minutos() {
        assert_eq!(duracao_minutos("08:00", "08:50"), Some(50));
    }

    #[test]
    fn intervalos_adjacentes_nao_sobrepoem() {
        // semiaberto: fim de um igual ao início do outro não conflita
        assert!(!intervalos_sobrepoem(480, 530, 530, 580));
        assert!(!intervalos_sobrepoem(530, 580, 480, 530));
        assert!(intervalos_sobrepoem(480, 530, 500, 520));
    }

    #[test]
    fn turno_e_dia_fazem_parse_dos_nomes_canonicos() {
        assert_eq!(Turno::parse("Manhã"), Some(Turno::Manha));
        assert_eq!(Turno::parse("Madrugada"), None);
        assert_eq!(DiaSemana::parse("Terça"), Some(DiaSemana::Terca));
        assert_eq!(DiaSemana::parse("Feriado"), None);
    }
}
