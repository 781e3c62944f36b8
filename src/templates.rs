// src/templates.rs
use askama::Template; // Trait necessário para Askama

// Casca da aplicação: o front (SPA) é servido daqui e fala com /api/*.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub app_name: &'static str,
}
