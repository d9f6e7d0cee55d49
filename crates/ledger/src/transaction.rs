//! Transaction ledger operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{ListScope, NewTransaction, Transaction};

/// Record a transaction.
///
/// The `txid` uniqueness constraint is enforced by SQLite, so two concurrent
/// inserts of the same payment hash leave exactly one row and the loser gets
/// [`DatabaseError::AlreadyExists`].
pub async fn insert_transaction(pool: &SqlitePool, tx: &NewTransaction) -> Result<Transaction> {
    if tx.invoice_key_used.trim().is_empty() {
        return Err(DatabaseError::Invalid {
            field: "invoice_key_used",
        });
    }
    if tx.txid.trim().is_empty() {
        return Err(DatabaseError::Invalid { field: "txid" });
    }

    let record = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO lightning_btc_plugin_transactions
            (user_id, wallet_id, txid, amount, description, invoice_key_used)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, wallet_id, txid, amount, description, invoice_key_used,
                  created_at, updated_at
        "#,
    )
    .bind(&tx.user_id)
    .bind(&tx.wallet_id)
    .bind(&tx.txid)
    .bind(tx.amount)
    .bind(&tx.description)
    .bind(&tx.invoice_key_used)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Transaction",
                    id: tx.txid.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    tracing::debug!(txid = %record.txid, id = record.id, "Recorded transaction");
    Ok(record)
}

/// Get a transaction by payment hash.
pub async fn get_transaction(pool: &SqlitePool, txid: &str) -> Result<Transaction> {
    sqlx::query_as::<_, Transaction>(
        r#"
        SELECT id, user_id, wallet_id, txid, amount, description, invoice_key_used,
               created_at, updated_at
        FROM lightning_btc_plugin_transactions
        WHERE txid = ?
        "#,
    )
    .bind(txid)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Transaction",
        id: txid.to_string(),
    })
}

/// List transactions in insertion order.
pub async fn list_transactions(pool: &SqlitePool, scope: ListScope<'_>) -> Result<Vec<Transaction>> {
    let rows = match scope {
        ListScope::All => {
            sqlx::query_as::<_, Transaction>(
                r#"
                SELECT id, user_id, wallet_id, txid, amount, description, invoice_key_used,
                       created_at, updated_at
                FROM lightning_btc_plugin_transactions
                ORDER BY id
                "#,
            )
            .fetch_all(pool)
            .await?
        }
        ListScope::User(user_id) => {
            sqlx::query_as::<_, Transaction>(
                r#"
                SELECT id, user_id, wallet_id, txid, amount, description, invoice_key_used,
                       created_at, updated_at
                FROM lightning_btc_plugin_transactions
                WHERE user_id = ?
                ORDER BY id
                "#,
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}

/// Count all recorded transactions.
pub async fn count_transactions(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM lightning_btc_plugin_transactions
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn invoice(user: &str, txid: &str, amount: i64) -> NewTransaction {
        NewTransaction {
            user_id: user.to_string(),
            wallet_id: format!("{}-wallet", user),
            txid: txid.to_string(),
            amount: Some(amount),
            description: Some("coffee".to_string()),
            invoice_key_used: "k1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let db = test_db().await;

        let record = insert_transaction(db.pool(), &invoice("u1", "abc123", 1000))
            .await
            .unwrap();

        assert!(record.id > 0);
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.wallet_id, "u1-wallet");
        assert_eq!(record.txid, "abc123");
        assert_eq!(record.amount, Some(1000));
        assert_eq!(record.description.as_deref(), Some("coffee"));
        assert_eq!(record.invoice_key_used, "k1");
        assert_eq!(record.created_at.len(), "2023-11-08T00:00:00.000Z".len());
        assert_eq!(&record.created_at[10..11], "T");
        assert!(record.created_at.ends_with('Z'));
        assert_eq!(record.created_at, record.updated_at);

        let fetched = get_transaction(db.pool(), "abc123").await.unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_duplicate_txid_rejected() {
        let db = test_db().await;

        insert_transaction(db.pool(), &invoice("u1", "dup", 1))
            .await
            .unwrap();
        let result = insert_transaction(db.pool(), &invoice("u2", "dup", 2)).await;

        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "Transaction", ref id }) if id == "dup"
        ));
        assert_eq!(count_transactions(db.pool()).await.unwrap(), 1);
        let kept = get_transaction(db.pool(), "dup").await.unwrap();
        assert_eq!(kept.user_id, "u1");
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_inserts_leave_one_row() {
        let db = test_db().await;
        let tx = invoice("u1", "race", 10);

        let (a, b) = tokio::join!(
            insert_transaction(db.pool(), &tx),
            insert_transaction(db.pool(), &tx)
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert_eq!(count_transactions(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_invoice_key_rejected() {
        let db = test_db().await;
        let mut tx = invoice("u1", "nokey", 5);
        tx.invoice_key_used = "  ".to_string();

        let result = insert_transaction(db.pool(), &tx).await;
        assert!(matches!(
            result,
            Err(DatabaseError::Invalid {
                field: "invoice_key_used"
            })
        ));
        assert_eq!(count_transactions(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_payment_without_amount() {
        let db = test_db().await;
        let tx = NewTransaction {
            amount: None,
            description: Some("Payment made".to_string()),
            ..invoice("u1", "paid", 0)
        };

        let record = insert_transaction(db.pool(), &tx).await.unwrap();
        assert_eq!(record.amount, None);
    }

    #[tokio::test]
    async fn test_list_scoped_to_user() {
        let db = test_db().await;
        insert_transaction(db.pool(), &invoice("alice", "a1", 1))
            .await
            .unwrap();
        insert_transaction(db.pool(), &invoice("bob", "b1", 2))
            .await
            .unwrap();
        insert_transaction(db.pool(), &invoice("alice", "a2", 3))
            .await
            .unwrap();

        let all = list_transactions(db.pool(), ListScope::All).await.unwrap();
        let txids: Vec<_> = all.iter().map(|t| t.txid.as_str()).collect();
        assert_eq!(txids, vec!["a1", "b1", "a2"]);

        let alice = list_transactions(db.pool(), ListScope::User("alice"))
            .await
            .unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|t| t.user_id == "alice"));

        let nobody = list_transactions(db.pool(), ListScope::User("carol"))
            .await
            .unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_transaction() {
        let db = test_db().await;
        let result = get_transaction(db.pool(), "missing").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn test_transaction_serializes_camel_case() {
        let tx = Transaction {
            id: 1,
            user_id: "u1".to_string(),
            wallet_id: "w1".to_string(),
            txid: "abc123".to_string(),
            amount: None,
            description: None,
            invoice_key_used: "k1".to_string(),
            created_at: "2023-11-08T00:00:00.000Z".to_string(),
            updated_at: "2023-11-08T00:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["walletId"], "w1");
        assert_eq!(json["invoiceKeyUsed"], "k1");
        assert!(json["amount"].is_null());
        assert!(json.get("user_id").is_none());
    }
}
