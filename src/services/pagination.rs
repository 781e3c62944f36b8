// src/services/pagination.rs

/// Tamanho de página do catálogo público.
pub const CATALOG_PAGE_SIZE: i64 = 8;
/// Tamanho de página da lojinha do utilizador.
pub const STORE_PAGE_SIZE: i64 = 12;

/// Total de páginas para `total` itens: ceil(total / page_size), com o ramo
/// explícito de "menos que uma página conta como uma" (inclusive total zero).
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if total < page_size {
        return 1;
    }
    let resto = total % page_size;
    let mut paginas = (total - resto) / page_size;
    if resto > 0 {
        paginas += 1;
    }
    paginas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menos_que_uma_pagina() {
        assert_eq!(page_count(0, 8), 1);
        assert_eq!(page_count(1, 8), 1);
        assert_eq!(page_count(7, 8), 1);
    }

    #[test]
    fn paginas_exatas() {
        assert_eq!(page_count(8, 8), 1);
        assert_eq!(page_count(16, 8), 2);
        assert_eq!(page_count(24, 12), 2);
    }

    #[test]
    fn arredonda_para_cima() {
        assert_eq!(page_count(9, 8), 2);
        assert_eq!(page_count(17, 8), 3);
        assert_eq!(page_count(13, 12), 2);
        assert_eq!(page_count(25, 12), 3);
    }
}
