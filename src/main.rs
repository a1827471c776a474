use demandlens::analysis::{MergeOptions, Merger};
use demandlens::config::{parse_date, DashboardConfig};
use demandlens::db::{CsvDemandStore, DemandStore};
use demandlens::models::chart::{ChartData, SelectedPoint};
use demandlens::models::region::Region;

/// Usage: demandlens [REGION] [PRIMARY_DATE] [COMPARISON_DATE]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = DashboardConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let region: Region = match args.first() {
        Some(code) => code.parse()?,
        None => config.default_region,
    };
    let primary_date = match args.get(1) {
        Some(raw) => parse_date("PRIMARY_DATE", raw)?,
        None => config.real_today,
    };
    let comparison_date = args
        .get(2)
        .map(|raw| parse_date("COMPARISON_DATE", raw))
        .transpose()?;

    let store = CsvDemandStore::open(config.data_dir.clone()).await?;
    let range = config.default_range;
    let actual = store.historical(region, range).await?;
    let forecasts = store.forecasts(region, range).await?;
    let weather = store.weather(region, range).await?;

    let mut options = MergeOptions::pinned(primary_date, config.real_today);
    if let Some(date) = comparison_date {
        options = options.with_comparison(date);
    }
    let chart = Merger::build_chart(&actual, &forecasts, &weather, &options);

    println!(
        "{} ({}) {} to {}, forecast vintage {}",
        region.display_name(),
        region.grid_operator(),
        range.start,
        range.end,
        primary_date
    );
    print_report(&chart, primary_date, comparison_date);

    Ok(())
}

fn print_report(
    chart: &ChartData,
    primary_date: chrono::NaiveDate,
    comparison_date: Option<chrono::NaiveDate>,
) {
    let m = &chart.metrics;
    println!("  Points: {}", chart.points.len());
    println!("  RMSE: {} MWh", m.rmse);
    println!("  MAE: {} MWh", m.mae);
    println!("  Max error: {} MWh", m.max_error);
    println!("  Mean error rate: {:.1}%", m.overall_error_rate);

    println!("  Outliers:");
    for point in chart.points.iter().filter(|p| p.is_outlier) {
        let selected = SelectedPoint::primary(point);
        println!(
            "    {}  actual {:>10.0}  forecast {:>10.0}  deviation {:+.1}%",
            selected.date,
            selected.actual.unwrap_or_default(),
            selected.predicted.unwrap_or_default(),
            selected.deviation_percent.unwrap_or_default()
        );
    }

    if let Some(comparison_date) = comparison_date {
        println!("  Comparison outliers (vintage {}):", comparison_date);
        for point in chart.points.iter().filter(|p| p.comparison_outlier) {
            let selected = SelectedPoint::comparison(point, primary_date, comparison_date);
            println!(
                "    {}  primary {:>10.0}  comparison {:>10.0}  divergence {:+.1}%{}",
                selected.date,
                selected.predicted.unwrap_or_default(),
                selected.comparison_predicted.unwrap_or_default(),
                selected.comparison_deviation_percent.unwrap_or_default(),
                if point.is_future { "  (future)" } else { "" }
            );
        }
    }
}
