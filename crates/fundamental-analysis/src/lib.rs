pub mod insight;
pub mod ratio;
pub mod valuation;

pub use insight::{summarize_insight, summarize_report};
pub use ratio::{format_number, Ratio, RatioFamily, RatioReport, RatioUnit, RatioValue};
pub use valuation::*;

use analysis_core::FinancialRecord;

/// `numerator / denominator` when both inputs were supplied.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<RatioValue> {
    let (num, den) = (numerator?, denominator?);
    Some(RatioValue::divide(num, den))
}

fn percent(numerator: Option<f64>, denominator: Option<f64>) -> Option<RatioValue> {
    ratio(numerator, denominator).map(|v| v.map(|x| x * 100.0))
}

fn days(numerator: Option<f64>, denominator: Option<f64>) -> Option<RatioValue> {
    ratio(numerator, denominator).map(|v| v.map(|x| x * 365.0))
}

/// Stateless ratio calculator over a [`FinancialRecord`].
pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Every ratio whose inputs are present in `record`.
    pub fn compute_ratios(&self, record: &FinancialRecord) -> RatioReport {
        let mut report = RatioReport::new();
        self.calculate_liquidity(record, &mut report);
        self.calculate_profitability(record, &mut report);
        self.calculate_leverage(record, &mut report);
        self.calculate_efficiency(record, &mut report);
        self.calculate_market_value(record, &mut report);
        report
    }

    fn calculate_liquidity(&self, r: &FinancialRecord, report: &mut RatioReport) {
        report.insert_opt(
            Ratio::CurrentRatio,
            ratio(r.current_assets, r.current_liabilities),
        );

        // Quick ratio strips inventory out of current assets
        if let (Some(assets), Some(inventory)) = (r.current_assets, r.inventory) {
            report.insert_opt(
                Ratio::QuickRatio,
                ratio(Some(assets - inventory), r.current_liabilities),
            );
        }

        report.insert_opt(
            Ratio::CashRatio,
            ratio(r.cash_and_equivalents, r.current_liabilities),
        );
        report.insert_opt(
            Ratio::OperatingCashFlowRatio,
            ratio(r.operating_cash_flow, r.current_liabilities),
        );
    }

    fn calculate_profitability(&self, r: &FinancialRecord, report: &mut RatioReport) {
        if let (Some(revenue), Some(cogs)) = (r.revenue, r.cost_of_goods_sold) {
            report.insert_opt(Ratio::GrossMargin, percent(Some(revenue - cogs), Some(revenue)));
        }

        report.insert_opt(Ratio::NetMargin, percent(r.net_income, r.revenue));
        report.insert_opt(
            Ratio::OperatingMargin,
            percent(r.operating_income.or(r.ebit), r.revenue),
        );
        report.insert_opt(Ratio::ReturnOnAssets, percent(r.net_income, r.total_assets));
        report.insert_opt(Ratio::ReturnOnEquity, percent(r.net_income, r.total_equity));
        report.insert_opt(
            Ratio::DividendYield,
            percent(r.annual_dividend_per_share, r.market_price),
        );
    }

    fn calculate_leverage(&self, r: &FinancialRecord, report: &mut RatioReport) {
        let obligations = r.total_liabilities.or(r.total_debt);

        report.insert_opt(Ratio::DebtToEquity, ratio(obligations, r.total_equity));
        report.insert_opt(
            Ratio::InterestCoverage,
            ratio(r.ebit.or(r.operating_income), r.interest_expense),
        );
        report.insert_opt(
            Ratio::DebtServiceCoverage,
            ratio(r.net_operating_income, r.total_debt_service),
        );
        report.insert_opt(Ratio::DebtToAsset, ratio(obligations, r.total_assets));
        report.insert_opt(Ratio::EquityRatio, ratio(r.total_equity, r.total_liabilities));
    }

    fn calculate_efficiency(&self, r: &FinancialRecord, report: &mut RatioReport) {
        let inventory = r.average_inventory.or(r.inventory);

        report.insert_opt(Ratio::AssetTurnover, ratio(r.revenue, r.total_assets));
        report.insert_opt(Ratio::InventoryTurnover, ratio(r.cost_of_goods_sold, inventory));
        report.insert_opt(
            Ratio::DaysInventoryOutstanding,
            days(inventory, r.cost_of_goods_sold),
        );
        report.insert_opt(
            Ratio::DaysSalesOutstanding,
            days(r.accounts_receivable, r.revenue),
        );
    }

    fn calculate_market_value(&self, r: &FinancialRecord, report: &mut RatioReport) {
        let price = r.market_price;

        if let (Some(price), Some(shares)) = (price, r.shares_outstanding) {
            report.insert(Ratio::MarketCap, RatioValue::from_f64(price * shares));
        }

        // EPS as reported, otherwise net income over shares
        let eps = match r.eps {
            Some(eps) => Some(RatioValue::from_f64(eps)),
            None => ratio(r.net_income, r.shares_outstanding),
        };
        report.insert_opt(Ratio::EarningsPerShare, eps);
        let eps = eps.and_then(|v| v.value());

        let book_value = r
            .book_value_per_share
            .or_else(|| ratio(r.total_equity, r.shares_outstanding).and_then(|v| v.value()));
        let sales_per_share = r
            .revenue_per_share
            .or_else(|| ratio(r.revenue, r.shares_outstanding).and_then(|v| v.value()));

        report.insert_opt(Ratio::PriceToEarnings, ratio(price, eps));
        report.insert_opt(Ratio::PriceToBook, ratio(price, book_value));
        report.insert_opt(Ratio::PriceToSales, ratio(price, sales_per_share));
        report.insert_opt(Ratio::EarningsYield, percent(eps, price));

        if let (Some(fair), Some(price)) = (r.fair_value, price) {
            if fair > 0.0 && price > 0.0 {
                report.insert(
                    Ratio::MarginOfSafety,
                    RatioValue::from_f64((fair - price) / fair * 100.0),
                );
            }
        }
    }
}

impl Default for FundamentalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper around [`FundamentalAnalysisEngine::compute_ratios`].
pub fn compute_ratios(record: &FinancialRecord) -> RatioReport {
    FundamentalAnalysisEngine::new().compute_ratios(record)
}
