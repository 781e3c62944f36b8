// src/models/product.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_ATIVADO: &str = "ativado";
pub const STATUS_DESATIVADO: &str = "desativado";

pub const IMAGE_PROFILE: &str = "profile";
pub const IMAGE_EXTRA: &str = "extra";

// Linha completa da tabela 'products'.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub store_id: i64,
    pub brand_id: Option<i64>,
    pub unique_id: String,
    pub name: String,
    pub description: Option<String>,
    pub quality: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount: f64,
    pub stock: i64,
    pub gender: String,
    pub category: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
    pub id: i64,
    pub filename: String,
}

// Linha da listagem do catálogo: produto + marca + imagem de perfil.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub gender: String,
    pub quality: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount: f64,
    pub brand: String,
    pub imagem: String,
    pub unique_id: String,
}

// Produto agregado para a página de detalhe: linha + imagem de perfil + extras.
#[derive(Debug, Serialize)]
pub struct ViewableProduct {
    #[serde(flatten)]
    pub product: Product,
    pub profile_image: Option<String>,
    pub imagens: Vec<ProductImage>,
}

// Item de carrinho: produto + loja de origem + quantidade pedida.
// A quantidade NÃO é validada contra o stock aqui; isso é do caller.
#[derive(Debug, Serialize)]
pub struct CartProduct {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub discount: f64,
    pub stock: i64,
    pub loja: i64,
    pub loja_nome: String,
    pub quantidade: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CartProductRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub discount: f64,
    pub stock: i64,
    pub loja: i64,
    pub loja_nome: String,
}

// Payload de criação/edição. Os campos de imagem são separados dos campos
// da linha: nunca entram no INSERT/UPDATE de 'products', vão para
// 'product_images' via save_image.
#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub description: Option<String>,
    pub quality: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount: Option<f64>,
    pub stock: i64,
    pub gender: String,
    pub category: Option<String>,
    pub brand_id: Option<i64>,
    pub imagem: Option<String>,
    pub imagens: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductData {
    pub id: i64,
    #[serde(flatten)]
    pub data: ProductData,
}

// Faceta de gênero do catálogo. 'unisex' vira um IN ('meninas','meninos');
// as demais são igualdade literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderFacet {
    Meninos,
    Meninas,
    Unisex,
    Papai,
    Mamae,
}

impl GenderFacet {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderFacet::Meninos => "meninos",
            GenderFacet::Meninas => "meninas",
            GenderFacet::Unisex => "unisex",
            GenderFacet::Papai => "papai",
            GenderFacet::Mamae => "mamae",
        }
    }
}

// Filtros de igualdade aceitos na listagem do catálogo.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductFilter {
    pub brand_id: Option<i64>,
    pub category: Option<String>,
    pub quality: Option<String>,
}

// Produto da lojinha do utilizador logado, com a imagem de perfil.
#[derive(Debug, Serialize, FromRow)]
pub struct StoreProduct {
    pub id: i64,
    pub unique_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount: f64,
    pub stock: i64,
    pub gender: String,
    pub category: Option<String>,
    pub status: String,
    pub imagem: String,
}

// Página da lojinha: produtos + total de páginas (tamanho fixo 12).
#[derive(Debug, Serialize)]
pub struct StoreProductsPage {
    pub paginas: i64,
    pub produtos: Vec<StoreProduct>,
}

/// Card de destaque da home: id, nome, marca, preço e imagem.
#[derive(Debug, Serialize, FromRow)]
pub struct FeaturedProduct {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub filename: String,
    pub unique_id: String,
}
