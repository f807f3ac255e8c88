// src/services/billing.rs

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BillingRepository,
    db::billing_repo::PurchaseStatusRow,
    models::billing::{
        FinancialReportResponse, LeadPurchase, LeadUsageResponse, Plan, PurchaseStatus,
        StatusBreakdown,
    },
};

// Leads extras ainda disponíveis para o cliente.
//
// O consumo que ultrapassa daily_limit×30 é abatido do saldo comprado; a
// janela de 30 dias é uma aproximação fixa, não um cálculo de calendário.
// O resultado nunca é negativo.
pub fn extra_leads_available(extra_total: i64, lifetime_consumed: i64, daily_limit: i32) -> i64 {
    let overconsumption = (lifetime_consumed - i64::from(daily_limit) * 30).max(0);
    (extra_total - overconsumption).max(0)
}

// Primeiro dia do mês anterior, com virada de ano em janeiro
pub fn first_of_previous_month(end: NaiveDate) -> NaiveDate {
    let (year, month) = if end.month() > 1 {
        (end.year(), end.month() - 1)
    } else {
        (end.year() - 1, 12)
    };

    // (year, month, 1) é sempre uma data válida
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(end)
}

pub fn purchase_amount(quantity: i32, extra_lead_price: Decimal) -> Decimal {
    Decimal::from(quantity) * extra_lead_price
}

// Janela efetiva do relatório: fim = hoje, início = primeiro dia do mês
// anterior, quando não informados. Inclusiva nas duas pontas.
pub fn report_window(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let end = end_date.unwrap_or(today);
    let start = start_date.unwrap_or_else(|| first_of_previous_month(end));
    (start, end)
}

// Mapa status -> {count, total} a partir das linhas agregadas. Período sem
// compras produz um mapa vazio, nunca erro.
pub fn breakdown_by_status(rows: Vec<PurchaseStatusRow>) -> HashMap<String, StatusBreakdown> {
    rows.into_iter()
        .map(|row| {
            (
                row.status,
                StatusBreakdown {
                    count: row.count,
                    total: row.total,
                },
            )
        })
        .collect()
}

#[derive(Clone)]
pub struct BillingService {
    repo: BillingRepository,
}

impl BillingService {
    pub fn new(repo: BillingRepository) -> Self {
        Self { repo }
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>, AppError> {
        self.repo.list_plans().await
    }

    // Uso do dia + saldo de leads extras do cliente. Cria preguiçosamente o
    // registro de consumo de hoje se for o primeiro acesso.
    pub async fn usage(&self, client_id: Uuid) -> Result<LeadUsageResponse, AppError> {
        self.repo
            .find_client(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente", client_id))?;

        let plan = self
            .repo
            .find_plan_for_client(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("Plano", client_id))?;

        let today = Utc::now().date_naive();
        let today_usage = self.repo.get_or_create_usage(client_id, today).await?;

        let extra_total = self.repo.sum_approved_quantity(client_id).await?;
        let lifetime_consumed = self.repo.sum_lifetime_consumed(client_id).await?;

        Ok(LeadUsageResponse {
            date: today,
            total_consumed: today_usage.total_consumed,
            daily_limit: plan.daily_limit,
            extra_leads_available: extra_leads_available(
                extra_total,
                lifetime_consumed,
                plan.daily_limit,
            ),
        })
    }

    // Registra uma compra de leads extras. A compra nasce "pendente" e não
    // valida saldo: a aprovação é uma ação administrativa posterior.
    pub async fn purchase_leads(
        &self,
        client_id: Uuid,
        quantity: i32,
    ) -> Result<LeadPurchase, AppError> {
        self.repo
            .find_client(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente", client_id))?;

        let plan = self
            .repo
            .find_plan_for_client(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("Plano", client_id))?;

        let amount = purchase_amount(quantity, plan.extra_lead_price);
        let purchase = self.repo.create_purchase(client_id, quantity, amount).await?;

        tracing::info!(
            client_id = %client_id,
            quantity,
            amount = %amount,
            "Compra de leads registrada"
        );

        Ok(purchase)
    }

    pub async fn set_purchase_status(
        &self,
        purchase_id: Uuid,
        status: PurchaseStatus,
    ) -> Result<LeadPurchase, AppError> {
        self.repo
            .set_purchase_status(purchase_id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Compra", purchase_id))
    }

    // Relatório financeiro do período (inclusivo nas duas pontas).
    // Padrões: fim = hoje, início = primeiro dia do mês anterior.
    // Período sem compras devolve zeros, nunca erro.
    pub async fn financial_report(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<FinancialReportResponse, AppError> {
        let (start, end) = report_window(start_date, end_date, Utc::now().date_naive());

        let total_revenue = self.repo.approved_revenue(start, end).await?;
        let total_leads_sold = self.repo.approved_leads_sold(start, end).await?;

        let purchases_by_status =
            breakdown_by_status(self.repo.purchases_by_status(start, end).await?);

        let revenue_by_client = self.repo.revenue_by_client(start, end).await?;

        Ok(FinancialReportResponse {
            total_revenue,
            total_leads_sold,
            purchases_by_status,
            revenue_by_client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    use crate::models::billing::PurchaseLeadsPayload;

    #[test]
    fn saldo_de_extras_sem_excesso_de_consumo() {
        // limite 10/dia => franquia de 300; consumo dentro da franquia
        assert_eq!(extra_leads_available(50, 200, 10), 50);
        assert_eq!(extra_leads_available(0, 0, 10), 0);
    }

    #[test]
    fn consumo_excedente_abate_o_saldo_comprado() {
        // franquia 300, consumiu 320 => 20 abatidos dos 50 comprados
        assert_eq!(extra_leads_available(50, 320, 10), 30);
    }

    #[test]
    fn saldo_nunca_fica_negativo() {
        assert_eq!(extra_leads_available(10, 1000, 10), 0);
        assert_eq!(extra_leads_available(0, 1000, 10), 0);
        assert_eq!(extra_leads_available(0, 0, 0), 0);
    }

    #[test]
    fn inicio_padrao_do_relatorio_e_o_mes_anterior() {
        let end = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(
            first_of_previous_month(end),
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
        );
    }

    #[test]
    fn inicio_padrao_vira_o_ano_em_janeiro() {
        let end = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(
            first_of_previous_month(end),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }

    #[test]
    fn janela_do_relatorio_usa_os_padroes_quando_nao_informada() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

        assert_eq!(
            report_window(None, None, today),
            (NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(), today)
        );

        // Fim explícito desloca também o início padrão
        let end = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(
            report_window(None, Some(end), today),
            (NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(), end)
        );

        let start = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert_eq!(report_window(Some(start), None, today), (start, today));
    }

    #[test]
    fn periodo_sem_compras_produz_quebra_vazia() {
        assert!(breakdown_by_status(Vec::new()).is_empty());
    }

    #[test]
    fn quebra_por_status_cobre_todas_as_linhas() {
        let rows = vec![
            PurchaseStatusRow {
                status: "aprovado".into(),
                count: 2,
                total: Decimal::new(16000, 2),
            },
            PurchaseStatusRow {
                status: "pendente".into(),
                count: 1,
                total: Decimal::new(5000, 2),
            },
        ];

        let breakdown = breakdown_by_status(rows);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown["aprovado"].count, 2);
        assert_eq!(breakdown["aprovado"].total, Decimal::new(16000, 2));
        assert_eq!(breakdown["pendente"].count, 1);
    }

    #[test]
    fn valor_da_compra_e_quantidade_vezes_preco() {
        // Decimal::new(1000, 2) == 10.00
        assert_eq!(
            purchase_amount(10, Decimal::new(1000, 2)),
            Decimal::new(10000, 2)
        );
        assert_eq!(
            purchase_amount(3, Decimal::new(750, 2)),
            Decimal::new(2250, 2)
        );
    }

    #[test]
    fn quantidade_nao_positiva_falha_na_validacao() {
        assert!(PurchaseLeadsPayload { quantity: 0 }.validate().is_err());
        assert!(PurchaseLeadsPayload { quantity: -5 }.validate().is_err());
        assert!(PurchaseLeadsPayload { quantity: 1 }.validate().is_ok());
    }
}
