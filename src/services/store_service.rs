// src/services/store_service.rs
use crate::{error::AppResult, models::store::FeaturedStore};
use sqlx::SqlitePool;

/// Id da loja de um utilizador, se ele tiver uma.
pub async fn store_id_for_owner(pool: &SqlitePool, user_id: i64) -> AppResult<Option<i64>> {
    let store_id = sqlx::query_scalar(
        "SELECT stores.id \
         FROM users \
         JOIN stores ON stores.owner_id = users.id \
         WHERE users.id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(store_id)
}

/// Lojinhas em destaque na home: nome, logo, produtos publicados e vendas.
/// Conta só produtos ativados (os publicados de fato).
pub async fn featured_stores(pool: &SqlitePool, limit: i64) -> AppResult<Vec<FeaturedStore>> {
    let lojas = sqlx::query_as::<_, FeaturedStore>(
        "SELECT stores.name, stores.profile_image, stores.sales, \
                COUNT(products.id) AS n_produtos \
         FROM stores \
         LEFT JOIN products \
                ON products.store_id = stores.id AND products.status = 'ativado' \
         GROUP BY stores.id \
         ORDER BY stores.sales DESC \
         LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(lojas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn destaque_conta_apenas_produtos_ativados() {
        let pool = test_pool().await;

        let owner_id = sqlx::query(
            "INSERT INTO users (name, last_name, email, password, name_id, birthdate, cpf) \
             VALUES ('Dona', 'Loja', 'dona@example.com', 'hash', 'dona1', '1990-03-15', '52998224725')",
        )
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        let store_id = sqlx::query(
            "INSERT INTO stores (owner_id, name, sales) VALUES (?1, 'Lojinha', 7)",
        )
        .bind(owner_id)
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

        for (i, status) in ["ativado", "ativado", "desativado"].iter().enumerate() {
            sqlx::query(
                "INSERT INTO products (store_id, unique_id, name, price, gender, status) \
                 VALUES (?1, ?2, 'P', 10.0, 'meninos', ?3)",
            )
            .bind(store_id)
            .bind(format!("u{i}"))
            .bind(status)
            .execute(&pool)
            .await
            .unwrap();
        }

        assert_eq!(
            store_id_for_owner(&pool, owner_id).await.unwrap(),
            Some(store_id)
        );
        assert_eq!(store_id_for_owner(&pool, owner_id + 99).await.unwrap(), None);

        let lojas = featured_stores(&pool, 6).await.unwrap();
        assert_eq!(lojas.len(), 1);
        assert_eq!(lojas[0].name, "Lojinha");
        assert_eq!(lojas[0].n_produtos, 2);
        assert_eq!(lojas[0].sales, 7);
    }
}
