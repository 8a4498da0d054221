use cae_core::models::Eligibility;
use cae_core::ports::SupplierRoster;

use crate::Db;
use crate::types::{DateTime, QuotationId, SupplierId};

impl SupplierRoster for Db {
    async fn invite_supplier(
        &self,
        quotation_id: QuotationId,
        supplier_id: SupplierId,
        as_of: DateTime,
    ) -> Result<bool, sqlx::Error> {
        let known: Option<i64> = sqlx::query_scalar("select 1 from quotation where id = $1")
            .bind(quotation_id)
            .fetch_optional(&self.reader)
            .await?;
        if known.is_none() {
            return Ok(false);
        }

        sqlx::query(
            r#"
            insert into
                invited_supplier (quotation_id, supplier_id, excluded, as_of)
            values
                ($1, $2, 0, $3)
            on conflict
                do nothing
            "#,
        )
        .bind(quotation_id)
        .bind(supplier_id)
        .bind(as_of)
        .execute(&self.writer)
        .await?;

        Ok(true)
    }

    async fn exclude_supplier(
        &self,
        quotation_id: QuotationId,
        supplier_id: SupplierId,
        _as_of: DateTime,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "update invited_supplier set excluded = 1 where quotation_id = $1 and supplier_id = $2",
        )
        .bind(quotation_id)
        .bind(supplier_id)
        .execute(&self.writer)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn invited_suppliers(
        &self,
        quotation_id: QuotationId,
    ) -> Result<Vec<SupplierId>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            select
                supplier_id
            from
                invited_supplier
            where
                quotation_id = $1
            and
                excluded = 0
            order by
                rowid asc
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.reader)
        .await
    }

    async fn eligibility(
        &self,
        quotation_id: QuotationId,
        supplier_id: SupplierId,
    ) -> Result<Eligibility, sqlx::Error> {
        let excluded: Option<bool> = sqlx::query_scalar(
            "select excluded from invited_supplier where quotation_id = $1 and supplier_id = $2",
        )
        .bind(quotation_id)
        .bind(supplier_id)
        .fetch_optional(&self.reader)
        .await?;

        Ok(match excluded {
            None => Eligibility::NotInvited,
            Some(true) => Eligibility::Excluded,
            Some(false) => Eligibility::Invited,
        })
    }
}
