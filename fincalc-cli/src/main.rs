//! Command-line front end for the calculator suite.
//!
//! Flag values stay raw strings and are pushed through the same form
//! reducer a UI would drive, so the full sanitize -> validate -> evaluate
//! pipeline runs on every invocation; field-tagged errors print as the
//! aggregate alert list, results as a panel.

use anyhow::{Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fincalc_core::calculators::{
    CompoundCalculator, CompoundField, LoanCalculator, LoanField, MortgageCalculator,
    MortgageField, RoiCalculator, RoiField, calculate_age,
};
use fincalc_core::fields::{Calculator, FormEvent, FormPhase, FormState};

#[derive(Parser, Debug)]
#[command(name = "fincalc")]
#[command(version, about = "Financial calculator suite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Monthly payment and total interest for an amortized loan.
    Loan {
        /// Loan amount
        #[arg(long)]
        amount: String,

        /// Annual interest rate, in percent
        #[arg(long)]
        rate: String,

        /// Term in months
        #[arg(long)]
        months: String,
    },

    /// Mortgage payment over the financed principal (loan minus down payment).
    Mortgage {
        /// Loan amount
        #[arg(long)]
        amount: String,

        /// Down payment (optional)
        #[arg(long, default_value = "")]
        down_payment: String,

        /// Annual interest rate, in percent
        #[arg(long)]
        rate: String,

        /// Term in years
        #[arg(long)]
        years: String,
    },

    /// Compound growth with an optional periodic contribution.
    Compound {
        /// Initial principal
        #[arg(long)]
        principal: String,

        /// Annual interest rate, in percent
        #[arg(long)]
        rate: String,

        /// Term in years
        #[arg(long)]
        years: String,

        /// Compounding periods per year
        #[arg(long, default_value = "1")]
        compounds_per_year: String,

        /// Periodic contribution amount (optional)
        #[arg(long, default_value = "")]
        contribution: String,

        /// Contributions per year
        #[arg(long, default_value = "12")]
        contributions_per_year: String,
    },

    /// Simple and annualized return on investment.
    Roi {
        /// Initial investment
        #[arg(long, default_value = "")]
        initial: String,

        /// Additional contributions (optional)
        #[arg(long, default_value = "")]
        additional: String,

        /// Final value of the investment
        #[arg(long)]
        final_value: String,

        /// Holding period in years (optional; enables the annualized rate)
        #[arg(long, default_value = "")]
        years: String,
    },

    /// Calendar age breakdown from a birth date.
    Age {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,

        /// Reference date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

/// Drives raw string inputs through a calculator form. Any active errors
/// after the calculate event abort with the aggregate alert list.
fn run_form<C: Calculator>(
    calculator: C,
    inputs: Vec<(C::Field, String)>,
) -> Result<C::Output> {
    let mut form = FormState::new(calculator);
    for (field, raw) in inputs {
        form = form.reduce(FormEvent::Input { field, raw });
    }
    let form = form.reduce(FormEvent::Calculate);
    match form.phase() {
        FormPhase::Result => form
            .result()
            .cloned()
            .ok_or_else(|| anyhow!("calculation produced no result")),
        _ => bail!("{}", form.error_messages().join("\n")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "parsed arguments");

    match cli.command {
        Command::Loan {
            amount,
            rate,
            months,
        } => {
            let result = run_form(
                LoanCalculator::default(),
                vec![
                    (LoanField::Amount, amount),
                    (LoanField::InterestRate, rate),
                    (LoanField::TermMonths, months),
                ],
            )?;
            println!("Loan of {} at {}% over {} months", result.amount, result.annual_rate, result.term_months);
            println!("  Monthly payment: {}", result.monthly_payment);
            println!("  Total paid:      {}", result.total_paid);
            println!("  Total interest:  {}", result.total_interest);
        }

        Command::Mortgage {
            amount,
            down_payment,
            rate,
            years,
        } => {
            let result = run_form(
                MortgageCalculator::default(),
                vec![
                    (MortgageField::LoanAmount, amount),
                    (MortgageField::DownPayment, down_payment),
                    (MortgageField::InterestRate, rate),
                    (MortgageField::TermYears, years),
                ],
            )?;
            println!(
                "Mortgage: {} financed ({} down) at {}% over {} months",
                result.principal, result.down_payment, result.annual_rate, result.term_months
            );
            println!("  Monthly payment: {}", result.monthly_payment);
            println!("  Total paid:      {}", result.total_paid);
            println!("  Total interest:  {}", result.total_interest);
        }

        Command::Compound {
            principal,
            rate,
            years,
            compounds_per_year,
            contribution,
            contributions_per_year,
        } => {
            let result = run_form(
                CompoundCalculator::default(),
                vec![
                    (CompoundField::Principal, principal),
                    (CompoundField::AnnualRate, rate),
                    (CompoundField::Years, years),
                    (CompoundField::CompoundsPerYear, compounds_per_year),
                    (CompoundField::Contribution, contribution),
                    (CompoundField::ContributionsPerYear, contributions_per_year),
                ],
            )?;
            println!(
                "{} at {}% for {} years, compounded {}x a year",
                result.principal, result.annual_rate, result.years, result.compounds_per_year
            );
            println!("  Final amount:        {}", result.final_amount);
            println!("  Total contributions: {}", result.total_contributions);
            println!("  Interest earned:     {}", result.interest_earned);
        }

        Command::Roi {
            initial,
            additional,
            final_value,
            years,
        } => {
            let result = run_form(
                RoiCalculator::default(),
                vec![
                    (RoiField::InitialInvestment, initial),
                    (RoiField::AdditionalContributions, additional),
                    (RoiField::FinalValue, final_value),
                    (RoiField::Years, years),
                ],
            )?;
            println!(
                "Invested {} with final value {}",
                result.total_invested, result.final_value
            );
            println!("  Gain: {}", result.gain);
            println!("  ROI:  {}%", result.roi_percent);
            match result.annualized_percent {
                Some(rate) => println!("  Annualized: {rate}%"),
                None => println!("  Annualized: n/a"),
            }
        }

        Command::Age { birth_date, as_of } => {
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            let age = calculate_age(birth_date, as_of)?;
            println!("Age on {}: {} years, {} months, {} days", age.as_of, age.years, age.months, age.days);
            println!("  Total days lived:    {}", age.total_days);
            println!("  Days until birthday: {}", age.days_until_birthday);
        }
    }

    Ok(())
}
