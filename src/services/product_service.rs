// src/services/product_service.rs
use crate::{
    error::{AppError, AppResult},
    models::product::{
        CartProduct, CartProductRow, FeaturedProduct, GenderFacet, Product, ProductCard,
        ProductData, ProductFilter, ProductImage, StoreProduct, StoreProductsPage,
        UpdateProductData, IMAGE_PROFILE, STATUS_ATIVADO, STATUS_DESATIVADO,
    },
    services::pagination::{page_count, CATALOG_PAGE_SIZE, STORE_PAGE_SIZE},
};
use sqlx::SqlitePool;
use std::collections::HashSet;
use uuid::Uuid;

/// Salva um produto novo. Os campos de imagem do payload nunca entram na
/// linha; ficam para save_image. Devolve (id, unique_id).
pub async fn create_product(
    pool: &SqlitePool,
    store_id: i64,
    data: &ProductData,
) -> AppResult<(i64, String)> {
    let unique_id = Uuid::new_v4().simple().to_string();

    let product_id = sqlx::query(
        "INSERT INTO products \
         (store_id, brand_id, unique_id, name, description, quality, price, original_price, \
          discount, stock, gender, category) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(store_id)
    .bind(data.brand_id)
    .bind(&unique_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.quality)
    .bind(data.price)
    .bind(data.original_price)
    .bind(data.discount.unwrap_or(0.0))
    .bind(data.stock)
    .bind(&data.gender)
    .bind(&data.category)
    .execute(pool)
    .await?
    .last_insert_rowid();

    tracing::info!("✅ Produto {} criado na loja {}.", product_id, store_id);
    Ok((product_id, unique_id))
}

/// Edita um produto pela chave primária.
pub async fn update_product(pool: &SqlitePool, data: &UpdateProductData) -> AppResult<()> {
    let rows_affected = sqlx::query(
        "UPDATE products SET \
             brand_id = ?1, name = ?2, description = ?3, quality = ?4, price = ?5, \
             original_price = ?6, discount = ?7, stock = ?8, gender = ?9, category = ?10, \
             updated_at = datetime('now') \
         WHERE id = ?11",
    )
    .bind(data.data.brand_id)
    .bind(&data.data.name)
    .bind(&data.data.description)
    .bind(&data.data.quality)
    .bind(data.data.price)
    .bind(data.data.original_price)
    .bind(data.data.discount.unwrap_or(0.0))
    .bind(data.data.stock)
    .bind(&data.data.gender)
    .bind(&data.data.category)
    .bind(data.id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::Failed(
            "Ocorreu um erro ao alterar o produto.".to_string(),
        ));
    }
    Ok(())
}

/// Guarda os metadados de uma imagem do produto ('profile' ou 'extra').
pub async fn save_image(
    pool: &SqlitePool,
    product_id: i64,
    filename: &str,
    image_type: &str,
) -> AppResult<()> {
    sqlx::query("INSERT INTO product_images (product_id, type, filename) VALUES (?1, ?2, ?3)")
        .bind(product_id)
        .bind(image_type)
        .bind(filename)
        .execute(pool)
        .await?;
    Ok(())
}

/// Ativa ou desativa um produto (única coluna de status; são os dois
/// únicos valores possíveis).
pub async fn set_product_active(pool: &SqlitePool, product_id: i64, active: bool) -> AppResult<()> {
    let status = if active {
        STATUS_ATIVADO
    } else {
        STATUS_DESATIVADO
    };

    let rows_affected = sqlx::query("UPDATE products SET status = ?1 WHERE id = ?2")
        .bind(status)
        .bind(product_id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::Failed("Produto não encontrado.".to_string()));
    }

    tracing::info!("Produto {} agora está '{}'.", product_id, status);
    Ok(())
}

// Cláusulas compartilhadas entre a listagem e a contagem do catálogo.
// Só filtros de igualdade; os valores entram por bind, na mesma ordem
// em que as cláusulas são acrescentadas.
fn push_catalog_clauses(sql: &mut String, filter: &ProductFilter, facet: Option<GenderFacet>) {
    if filter.brand_id.is_some() {
        sql.push_str(" AND products.brand_id = ?");
    }
    if filter.category.is_some() {
        sql.push_str(" AND products.category = ?");
    }
    if filter.quality.is_some() {
        sql.push_str(" AND products.quality = ?");
    }
    match facet {
        // unisex casa os dois gêneros infantis
        Some(GenderFacet::Unisex) => sql.push_str(" AND products.gender IN ('meninas', 'meninos')"),
        Some(_) => sql.push_str(" AND products.gender = ?"),
        None => {}
    }
}

fn bind_catalog_clauses<'q, O>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &'q ProductFilter,
    facet: Option<GenderFacet>,
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(brand_id) = filter.brand_id {
        query = query.bind(brand_id);
    }
    if let Some(category) = &filter.category {
        query = query.bind(category);
    }
    if let Some(quality) = &filter.quality {
        query = query.bind(quality);
    }
    match facet {
        Some(GenderFacet::Unisex) | None => {}
        Some(facet) => query = query.bind(facet.as_str()),
    }
    query
}

/// Lista o catálogo público: só produtos ativados, com marca e imagem de
/// perfil, página de 8, ordenado por criação ascendente. `page` começa em 1.
///
/// A linha pode sair duplicada se um produto tiver mais de uma imagem
/// 'profile' (o banco não impede); o resultado é deduplicado por id de
/// produto antes de ser devolvido, em qualquer posição.
pub async fn list_products(
    pool: &SqlitePool,
    filter: &ProductFilter,
    facet: Option<GenderFacet>,
    page: i64,
) -> AppResult<Vec<ProductCard>> {
    let mut sql = String::from(
        "SELECT products.id, products.name, products.description, products.gender, \
                products.quality, products.price, products.original_price, products.discount, \
                brands.name AS brand, product_images.filename AS imagem, products.unique_id \
         FROM products \
         JOIN brands ON brands.id = products.brand_id \
         JOIN product_images ON product_images.product_id = products.id \
         WHERE products.status = 'ativado' AND product_images.type = 'profile'",
    );
    push_catalog_clauses(&mut sql, filter, facet);
    sql.push_str(&format!(
        " ORDER BY products.created_at ASC LIMIT {CATALOG_PAGE_SIZE} OFFSET ?"
    ));

    let offset = (page.max(1) - 1) * CATALOG_PAGE_SIZE;
    let query = bind_catalog_clauses(sqlx::query_as::<_, ProductCard>(&sql), filter, facet);
    let rows = query.bind(offset).fetch_all(pool).await?;

    Ok(dedup_by_id(rows))
}

/// Total de páginas do catálogo para os mesmos filtros da listagem.
pub async fn count_product_pages(
    pool: &SqlitePool,
    filter: &ProductFilter,
    facet: Option<GenderFacet>,
) -> AppResult<i64> {
    let mut sql =
        String::from("SELECT COUNT(*) FROM products WHERE products.status = 'ativado'");
    push_catalog_clauses(&mut sql, filter, facet);

    let query = bind_catalog_clauses(sqlx::query_as::<_, (i64,)>(&sql), filter, facet);
    let (total,) = query.fetch_one(pool).await?;

    Ok(page_count(total, CATALOG_PAGE_SIZE))
}

// Remove duplicatas por id de produto, em qualquer posição do resultado,
// preservando a primeira ocorrência.
fn dedup_by_id(rows: Vec<ProductCard>) -> Vec<ProductCard> {
    let mut vistos = HashSet::new();
    rows.into_iter().filter(|p| vistos.insert(p.id)).collect()
}

/// Produtos da lojinha do utilizador, com imagem de perfil, página de 12.
/// `page` começa em 0. Devolve também o total de páginas.
pub async fn paginated_store_products(
    pool: &SqlitePool,
    user_id: i64,
    page: i64,
) -> AppResult<StoreProductsPage> {
    let produtos = sqlx::query_as::<_, StoreProduct>(
        "SELECT products.id, products.unique_id, products.name, products.description, \
                products.price, products.original_price, products.discount, products.stock, \
                products.gender, products.category, products.status, \
                product_images.filename AS imagem \
         FROM users \
         JOIN stores ON stores.owner_id = users.id \
         JOIN products ON products.store_id = stores.id \
         JOIN product_images ON product_images.product_id = products.id \
         WHERE users.id = ?1 AND product_images.type = 'profile' \
         ORDER BY products.created_at ASC \
         LIMIT ?2 OFFSET ?3",
    )
    .bind(user_id)
    .bind(STORE_PAGE_SIZE)
    .bind(page.max(0) * STORE_PAGE_SIZE)
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) \
         FROM users \
         JOIN stores ON stores.owner_id = users.id \
         JOIN products ON products.store_id = stores.id \
         WHERE users.id = ?1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(StoreProductsPage {
        paginas: page_count(total, STORE_PAGE_SIZE),
        produtos,
    })
}

// Imagens de um produto: perfil (no máximo uma é esperada) + extras.
async fn load_images(
    pool: &SqlitePool,
    product_id: i64,
) -> AppResult<(Option<String>, Vec<ProductImage>)> {
    let profile: Option<String> = sqlx::query_scalar(
        "SELECT filename FROM product_images \
         WHERE product_id = ?1 AND type = 'profile' LIMIT 1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    let extras = sqlx::query_as::<_, ProductImage>(
        "SELECT id, filename FROM product_images WHERE product_id = ?1 AND type = 'extra'",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok((profile, extras))
}

/// Produto de vitrine pelo unique_id: linha + imagem de perfil + extras.
pub async fn get_viewable_product(
    pool: &SqlitePool,
    unique_id: &str,
) -> AppResult<Option<crate::models::product::ViewableProduct>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE unique_id = ?1")
        .bind(unique_id)
        .fetch_optional(pool)
        .await?;

    let Some(product) = product else {
        return Ok(None);
    };

    let (profile_image, imagens) = load_images(pool, product.id).await?;
    Ok(Some(crate::models::product::ViewableProduct {
        product,
        profile_image,
        imagens,
    }))
}

/// Mesmo agregado da vitrine, mas restrito ao dono: o produto precisa
/// pertencer à loja do utilizador.
pub async fn get_editable_product(
    pool: &SqlitePool,
    unique_id: &str,
    owner_id: i64,
) -> AppResult<Option<crate::models::product::ViewableProduct>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT products.* \
         FROM users \
         JOIN stores ON stores.owner_id = users.id \
         JOIN products ON products.store_id = stores.id \
         WHERE users.id = ?1 AND products.unique_id = ?2",
    )
    .bind(owner_id)
    .bind(unique_id)
    .fetch_optional(pool)
    .await?;

    let Some(product) = product else {
        return Ok(None);
    };

    let (profile_image, imagens) = load_images(pool, product.id).await?;
    Ok(Some(crate::models::product::ViewableProduct {
        product,
        profile_image,
        imagens,
    }))
}

/// Item de carrinho: produto + loja de origem, com a quantidade pedida
/// anexada. O stock NÃO é validado aqui.
pub async fn get_product_for_cart(
    pool: &SqlitePool,
    product_id: i64,
    quantidade: i64,
) -> AppResult<Option<CartProduct>> {
    let row = sqlx::query_as::<_, CartProductRow>(
        "SELECT products.id, products.name, products.price, products.discount, products.stock, \
                stores.id AS loja, stores.name AS loja_nome \
         FROM products \
         JOIN stores ON stores.id = products.store_id \
         WHERE products.id = ?1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|p| CartProduct {
        id: p.id,
        name: p.name,
        price: p.price,
        discount: p.discount,
        stock: p.stock,
        loja: p.loja,
        loja_nome: p.loja_nome,
        quantidade,
    }))
}

/// Stock atual de um produto.
pub async fn get_product_stock(pool: &SqlitePool, product_id: i64) -> AppResult<Option<i64>> {
    let stock = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(stock)
}

/// Produtos em destaque na home: os mais recentes entre os ativados.
pub async fn featured_products(pool: &SqlitePool, limit: i64) -> AppResult<Vec<FeaturedProduct>> {
    let produtos = sqlx::query_as::<_, FeaturedProduct>(
        "SELECT products.id, products.name, brands.name AS brand, products.price, \
                product_images.filename, products.unique_id \
         FROM products \
         JOIN brands ON brands.id = products.brand_id \
         JOIN product_images ON product_images.product_id = products.id \
         WHERE products.status = 'ativado' AND product_images.type = ?1 \
         ORDER BY products.created_at DESC \
         LIMIT ?2",
    )
    .bind(IMAGE_PROFILE)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(dedup_featured(produtos))
}

fn dedup_featured(rows: Vec<FeaturedProduct>) -> Vec<FeaturedProduct> {
    let mut vistos = HashSet::new();
    rows.into_iter().filter(|p| vistos.insert(p.id)).collect()
}
