// src/services/dashboard.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{ChartData, DashboardStats, Dataset, SourceCount, StatusCount},
};

// Statuses que contam como lead qualificado nos cards
const QUALIFIED_STATUSES: [&str; 3] = ["qualificado", "proposta", "fechado"];
const CONVERTED_STATUSES: [&str; 1] = ["fechado"];

// Ticket médio fixo usado na estimativa de receita dos cards
const AVERAGE_TICKET: i64 = 3000;

// Paleta dos gráficos de pizza/doughnut
const PIE_COLORS: [&str; 6] = [
    "#3498db", "#2ecc71", "#e74c3c", "#f39c12", "#9b59b6", "#34495e",
];

// Percentual arredondado para 1 casa; 0 quando o denominador é 0
pub fn percent(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 1000.0).round() / 10.0
}

// Formata um valor no padrão monetário brasileiro: 126000 -> "126.000,00"
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let raw = format!("{:.2}", rounded);

    let (integer, fraction) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{sign}{grouped},{fraction}")
}

// Os 12 baldes mensais do gráfico, do mais antigo para o mais novo.
//
// Usa a aproximação literal de 30 dias por mês (hoje − (11−i)×30 dias) em
// vez de meses de calendário; isso desloca fronteiras de balde de propósito,
// para manter o comportamento histórico dos gráficos.
pub fn month_buckets(today: DateTime<Utc>) -> Vec<(i32, u32, String)> {
    use chrono::Datelike;

    (0..12)
        .map(|i| {
            let dt = today - Duration::days((11 - i) * 30);
            (dt.year(), dt.month(), dt.format("%b/%y").to_string())
        })
        .collect()
}

// Preenche os baldes com os valores agregados, zerando meses sem dados
pub fn fill_buckets<T: Clone + Default>(
    buckets: &[(i32, u32, String)],
    rows: &[(i32, u32, T)],
) -> Vec<T> {
    buckets
        .iter()
        .map(|(year, month, _)| {
            rows.iter()
                .find(|(y, m, _)| y == year && m == month)
                .map(|(_, _, v)| v.clone())
                .unwrap_or_default()
        })
        .collect()
}

// Top-5 origens por volume; o resto é agrupado em "Outros"
pub fn top_sources(rows: &[SourceCount]) -> (Vec<String>, Vec<i64>) {
    let mut labels = Vec::new();
    let mut values = Vec::new();

    for row in rows {
        match &row.source {
            Some(source) if !source.is_empty() => {
                labels.push(source.clone());
                values.push(row.count);
            }
            _ => {}
        }
    }

    if labels.len() > 5 {
        let other: i64 = values[5..].iter().sum();
        labels.truncate(5);
        values.truncate(5);
        labels.push("Outros".to_string());
        values.push(other);
    }

    (labels, values)
}

fn status_breakdown(rows: &[StatusCount]) -> (Vec<String>, Vec<i64>) {
    let mut labels = Vec::new();
    let mut values = Vec::new();

    for row in rows {
        match &row.status {
            Some(status) if !status.is_empty() => {
                labels.push(status.clone());
                values.push(row.count);
            }
            _ => {}
        }
    }

    (labels, values)
}

fn pie_colors(len: usize) -> Value {
    json!(PIE_COLORS.iter().take(len).collect::<Vec<_>>())
}

fn line_dataset(label: &str, data: Vec<Value>, color: &str) -> Dataset {
    Dataset {
        label: label.to_string(),
        data,
        background_color: json!(color),
        border_color: Some(color.to_string()),
        tension: Some(0.1),
    }
}

fn pie_dataset(label: &str, data: Vec<i64>, colors: Value) -> Dataset {
    Dataset {
        label: label.to_string(),
        data: data.into_iter().map(|v| json!(v)).collect(),
        background_color: colors,
        border_color: None,
        tension: None,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    // Estatísticas agregadas do dashboard.
    //
    // MODO DEGRADADO: este é o único componente que não propaga falhas de
    // agregação. Qualquer erro é logado e respondido com um payload de
    // exemplo fixo, para a página nunca quebrar.
    pub async fn stats(&self) -> DashboardStats {
        match self.collect().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!(error = %e, "Falha na agregação do dashboard; usando dados de exemplo");
                sample_stats(Utc::now())
            }
        }
    }

    async fn collect(&self) -> Result<DashboardStats, AppError> {
        let now = Utc::now();
        let thirty_days_ago = now - Duration::days(30);
        let one_year_ago = now - Duration::days(365);

        // --- Cards (últimos 30 dias) ---
        let total_leads = self.repo.count_leads_since(thirty_days_ago).await?;
        let qualified_leads = self
            .repo
            .count_leads_since_with_status(thirty_days_ago, &QUALIFIED_STATUSES)
            .await?;
        let converted_leads = self
            .repo
            .count_leads_since_with_status(thirty_days_ago, &CONVERTED_STATUSES)
            .await?;

        let estimated_revenue = Decimal::from(converted_leads * AVERAGE_TICKET);

        // --- Gráficos (últimos 12 meses) ---
        let buckets = month_buckets(now);
        let labels: Vec<String> = buckets.iter().map(|(_, _, l)| l.clone()).collect();

        let lead_rows: Vec<(i32, u32, i64)> = self
            .repo
            .leads_by_month(one_year_ago)
            .await?
            .into_iter()
            .map(|r| (r.year, r.month as u32, r.count))
            .collect();
        let leads_series = fill_buckets(&buckets, &lead_rows);

        let commission_rows: Vec<(i32, u32, Decimal)> = self
            .repo
            .commissions_by_month(one_year_ago)
            .await?
            .into_iter()
            .map(|r| (r.year, r.month as u32, r.total))
            .collect();
        let commissions_series = fill_buckets(&buckets, &commission_rows);

        let (source_labels, source_values) = top_sources(&self.repo.leads_by_source().await?);
        let (status_labels, status_values) = status_breakdown(&self.repo.leads_by_status().await?);

        Ok(DashboardStats {
            total_leads,
            qualified_leads,
            qualified_rate: percent(qualified_leads, total_leads),
            converted_leads,
            conversion_rate: percent(converted_leads, total_leads),
            estimated_revenue: format_brl(estimated_revenue),
            average_ticket: format_brl(Decimal::from(AVERAGE_TICKET)),
            leads_evolution_data: ChartData {
                labels: labels.clone(),
                datasets: vec![line_dataset(
                    "Leads",
                    leads_series.into_iter().map(|v| json!(v)).collect(),
                    "#2196F3",
                )],
            },
            conversion_by_source_data: ChartData {
                labels: source_labels.clone(),
                datasets: vec![pie_dataset(
                    "Origem",
                    source_values,
                    pie_colors(source_labels.len()),
                )],
            },
            lead_status_data: ChartData {
                labels: status_labels.clone(),
                datasets: vec![pie_dataset(
                    "Status",
                    status_values,
                    pie_colors(status_labels.len()),
                )],
            },
            commissions_evolution_data: ChartData {
                labels,
                datasets: vec![line_dataset(
                    "Comissões (R$)",
                    commissions_series.into_iter().map(|v| json!(v)).collect(),
                    "#2ecc71",
                )],
            },
        })
    }
}

// Payload fixo de exemplo devolvido quando a agregação falha
fn sample_stats(now: DateTime<Utc>) -> DashboardStats {
    let labels: Vec<String> = month_buckets(now)
        .into_iter()
        .map(|(_, _, l)| l)
        .collect();

    let sample_leads: Vec<Value> = [62, 75, 80, 95, 88, 102, 110, 98, 120, 115, 130, 124]
        .iter()
        .map(|v| json!(v))
        .collect();
    let sample_commissions: Vec<Value> = [
        1800, 2100, 2400, 2000, 2600, 3100, 2900, 3300, 3000, 3600, 4100, 3900,
    ]
    .iter()
    .map(|v| json!(v))
    .collect();

    DashboardStats {
        total_leads: 124,
        qualified_leads: 78,
        qualified_rate: 62.9,
        converted_leads: 42,
        conversion_rate: 33.8,
        estimated_revenue: "126.000,00".to_string(),
        average_ticket: "3.000,00".to_string(),
        leads_evolution_data: ChartData {
            labels: labels.clone(),
            datasets: vec![line_dataset("Leads", sample_leads, "#2196F3")],
        },
        conversion_by_source_data: ChartData {
            labels: vec![
                "Facebook".into(),
                "Google".into(),
                "Instagram".into(),
                "Indicação".into(),
                "Site".into(),
                "Outros".into(),
            ],
            datasets: vec![pie_dataset(
                "Origem",
                vec![35, 45, 25, 20, 15, 10],
                pie_colors(6),
            )],
        },
        lead_status_data: ChartData {
            labels: vec![
                "Novo".into(),
                "Contato".into(),
                "Qualificado".into(),
                "Proposta".into(),
                "Fechado".into(),
                "Perdido".into(),
            ],
            datasets: vec![pie_dataset(
                "Status",
                vec![30, 25, 20, 15, 10, 5],
                pie_colors(6),
            )],
        },
        commissions_evolution_data: ChartData {
            labels,
            datasets: vec![line_dataset("Comissões (R$)", sample_commissions, "#2ecc71")],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn percentual_arredonda_para_uma_casa() {
        assert_eq!(percent(78, 124), 62.9);
        assert_eq!(percent(42, 124), 33.9);
        assert_eq!(percent(1, 3), 33.3);
    }

    #[test]
    fn percentual_com_denominador_zero_e_zero() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(10, 0), 0.0);
    }

    #[test]
    fn formatacao_monetaria_brasileira() {
        assert_eq!(format_brl(Decimal::from(126_000)), "126.000,00");
        assert_eq!(format_brl(Decimal::from(3_000)), "3.000,00");
        assert_eq!(format_brl(Decimal::new(123_456_789, 2)), "1.234.567,89");
        assert_eq!(format_brl(Decimal::ZERO), "0,00");
        assert_eq!(format_brl(Decimal::from(999)), "999,00");
    }

    #[test]
    fn sempre_doze_baldes_do_mais_antigo_para_o_mais_novo() {
        let today = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        let buckets = month_buckets(today);

        assert_eq!(buckets.len(), 12);
        // O último balde é o mês corrente
        assert_eq!(buckets[11].0, 2026);
        assert_eq!(buckets[11].1, 8);
        assert_eq!(buckets[11].2, "Aug/26");
        // O primeiro está ~330 dias no passado
        assert_eq!(buckets[0].0, 2025);
    }

    #[test]
    fn baldes_sem_dados_sao_zerados() {
        let today = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        let buckets = month_buckets(today);

        let rows = vec![(2026, 8u32, 7i64)];
        let series = fill_buckets(&buckets, &rows);

        assert_eq!(series.len(), 12);
        assert_eq!(series[11], 7);
        assert!(series[..11].iter().all(|v| *v == 0));
    }

    #[test]
    fn top_5_origens_e_o_resto_vira_outros() {
        let rows: Vec<SourceCount> = [
            ("Google", 45),
            ("Facebook", 35),
            ("Instagram", 25),
            ("Indicação", 20),
            ("Site", 15),
            ("Rádio", 6),
            ("TV", 4),
        ]
        .iter()
        .map(|(s, c)| SourceCount {
            source: Some(s.to_string()),
            count: *c,
        })
        .collect();

        let (labels, values) = top_sources(&rows);

        assert_eq!(labels.len(), 6);
        assert_eq!(labels[5], "Outros");
        assert_eq!(values[5], 10); // 6 + 4
    }

    #[test]
    fn origens_vazias_sao_ignoradas() {
        let rows = vec![
            SourceCount {
                source: None,
                count: 99,
            },
            SourceCount {
                source: Some("Google".into()),
                count: 3,
            },
        ];

        let (labels, values) = top_sources(&rows);
        assert_eq!(labels, vec!["Google"]);
        assert_eq!(values, vec![3]);
    }

    #[test]
    fn payload_de_exemplo_tem_doze_pontos() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        let sample = sample_stats(now);

        assert_eq!(sample.leads_evolution_data.labels.len(), 12);
        assert_eq!(sample.leads_evolution_data.datasets[0].data.len(), 12);
        assert_eq!(sample.commissions_evolution_data.datasets[0].data.len(), 12);
        assert_eq!(sample.total_leads, 124);
    }

    #[tokio::test]
    async fn falha_de_agregacao_degrada_para_os_dados_de_exemplo() {
        // Pool preguiçoso apontando para um banco inexistente: a primeira
        // consulta falha e o serviço responde o payload de exemplo.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(2))
            .connect_lazy("postgres://localhost:1/autocred_test")
            .expect("pool lazy");
        let svc = DashboardService::new(DashboardRepository::new(pool));

        let stats = svc.stats().await;

        assert_eq!(stats.total_leads, 124);
        assert_eq!(stats.qualified_leads, 78);
        assert_eq!(stats.qualified_rate, 62.9);
        assert_eq!(stats.leads_evolution_data.labels.len(), 12);
        assert_eq!(stats.leads_evolution_data.datasets[0].data.len(), 12);
    }
}
