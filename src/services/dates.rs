// src/services/dates.rs
// Datas circulam em dois formatos textuais: DD-MM-YYYY na interface e
// YYYY-MM-DD no banco. Toda fronteira de I/O que toca birthdate/issue_date
// passa por aqui.

use crate::error::{AppError, AppResult};
use chrono::NaiveDate;

const DISPLAY_FORMAT: &str = "%d-%m-%Y";
const STORAGE_FORMAT: &str = "%Y-%m-%d";

/// Converte "15-03-1990" (exibição) para "1990-03-15" (armazenamento).
pub fn to_storage(display: &str) -> AppResult<String> {
    let date = NaiveDate::parse_from_str(display, DISPLAY_FORMAT)
        .map_err(|_| AppError::Failed(format!("Data inválida: {display}")))?;
    Ok(date.format(STORAGE_FORMAT).to_string())
}

/// Converte "1990-03-15" (armazenamento) de volta para "15-03-1990".
pub fn to_display(storage: &str) -> AppResult<String> {
    let date = NaiveDate::parse_from_str(storage, STORAGE_FORMAT)
        .map_err(|_| AppError::Failed(format!("Data inválida: {storage}")))?;
    Ok(date.format(DISPLAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converte_para_armazenamento() {
        assert_eq!(to_storage("15-03-1990").unwrap(), "1990-03-15");
    }

    #[test]
    fn converte_de_volta_para_exibicao() {
        assert_eq!(to_display("1990-03-15").unwrap(), "15-03-1990");
    }

    #[test]
    fn round_trip() {
        let armazenada = to_storage("01-12-2005").unwrap();
        assert_eq!(armazenada, "2005-12-01");
        assert_eq!(to_display(&armazenada).unwrap(), "01-12-2005");
    }

    #[test]
    fn rejeita_data_invalida() {
        assert!(to_storage("31-02-1990").is_err());
        assert!(to_storage("1990-03-15").is_err()); // formato trocado
        assert!(to_display("15-03-1990").is_err());
    }
}
