// src/services/cpf.rs
// Validação do dígito verificador de CPF (módulo 11, dois dígitos).

/// Valida um CPF. Aceita o número com ou sem pontuação ("529.982.247-25").
pub fn validate(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    // CPFs com todos os dígitos iguais passam no módulo 11, mas são inválidos
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

// Dígito verificador: soma ponderada com pesos decrescentes (n+1 .. 2),
// vezes 10, módulo 11; resultado 10 conta como 0.
fn check_digit(digits: &[u32]) -> u32 {
    let n = digits.len() as u32;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (n + 1 - i as u32))
        .sum();
    (sum * 10) % 11 % 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aceita_cpf_valido() {
        assert!(validate("529.982.247-25"));
        assert!(validate("52998224725"));
    }

    #[test]
    fn rejeita_mutacao_de_um_digito() {
        let valido = "52998224725";
        for pos in 0..valido.len() {
            for d in b'0'..=b'9' {
                let mut mutado = valido.as_bytes().to_vec();
                if mutado[pos] == d {
                    continue;
                }
                mutado[pos] = d;
                let mutado = String::from_utf8(mutado).unwrap();
                assert!(!validate(&mutado), "mutação aceita indevidamente: {mutado}");
            }
        }
    }

    #[test]
    fn rejeita_digitos_repetidos() {
        assert!(!validate("111.111.111-11"));
        assert!(!validate("00000000000"));
    }

    #[test]
    fn rejeita_tamanho_errado() {
        assert!(!validate(""));
        assert!(!validate("1234567890"));
        assert!(!validate("123456789012"));
    }
}
