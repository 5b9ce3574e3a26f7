//! `destiny`: command-line front end for the Destiny Matrix.
//!
//! `calc` and `arcana` run locally; `submit` and `show` talk to a running
//! `destiny-server`.
//!
//! # Usage
//!
//! ```text
//! destiny calc 15.03.1990
//! destiny arcana 10
//! destiny --url http://localhost:8080 submit --name Ada --date 15.03.1990 --gender female
//! destiny show 3f0c…
//! ```

mod client;
mod render;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use client::{ApiClient, ApiConfig, SubmitBody};
use destiny_core::{BirthDate, MatrixCalculation, catalog, record::Gender};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "destiny", version, about = "Destiny Matrix calculator and API client")]
struct Args {
  /// Base URL of the destiny server.
  #[arg(long, env = "DESTINY_URL", default_value = "http://localhost:8080", global = true)]
  url: String,

  /// User id sent as `x-user-id`.
  #[arg(long, env = "DESTINY_USER_ID", global = true)]
  user_id: Option<Uuid>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Calculate a matrix locally.
  Calc {
    /// Birth date as DD.MM.YYYY.
    date: String,
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
  },
  /// Describe one of the 22 arcana.
  Arcana {
    number: u32,
  },
  /// Submit a matrix to the server.
  Submit {
    #[arg(long)]
    name:   String,
    /// Birth date as DD.MM.YYYY.
    #[arg(long)]
    date:   String,
    #[arg(long, value_enum)]
    gender: GenderArg,
    #[arg(long)]
    json:   bool,
  },
  /// Fetch a stored matrix from the server.
  Show {
    id: Uuid,
    #[arg(long)]
    json: bool,
  },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GenderArg {
  Male,
  Female,
}

impl From<GenderArg> for Gender {
  fn from(g: GenderArg) -> Self {
    match g {
      GenderArg::Male => Gender::Male,
      GenderArg::Female => Gender::Female,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let api = || ApiClient::new(ApiConfig { base_url: args.url.clone(), user_id: args.user_id });

  match &args.command {
    Command::Calc { date, json } => {
      let birth_date = BirthDate::parse_checked(date).with_context(|| format!("invalid date {date:?}"))?;
      let calc = MatrixCalculation::from_date(birth_date);
      if *json {
        print_json(&calc)?;
      } else {
        println!("Destiny Matrix for {birth_date}\n");
        print!("{}", render::matrix(&calc));
      }
    }
    Command::Arcana { number } => {
      let info = catalog::arcana_info(*number)
        .ok_or_else(|| anyhow!("arcana must be between 1 and 22, got {number}"))?;
      print!("{}", render::arcana(info));
    }
    Command::Submit { name, date, gender, json } => {
      let created = api()?
        .submit(&SubmitBody { name, birth_date: date, gender: (*gender).into() })
        .await?;
      if *json {
        print_json(&created)?;
      } else {
        println!("Matrix {}\n", created.id);
        print!("{}", render::matrix(&created.calculation));
        println!("\nInterpretation unlocked: {}", yes_no(created.has_access));
      }
    }
    Command::Show { id, json } => {
      let view = api()?.show(*id).await?;
      if *json {
        print_json(&view)?;
      } else {
        let m = &view.matrix;
        println!("{} ({}, born {})", m.name, m.gender, m.birth_date);
        println!("Matrix {} created {}\n", m.id, m.created_at.format("%Y-%m-%d %H:%M UTC"));
        print!("{}", render::matrix(&view.calculation));
        println!("\nInterpretation unlocked: {}", yes_no(view.has_access));
      }
    }
  }

  Ok(())
}

fn print_json(value: &impl Serialize) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value).context("serialising output")?);
  Ok(())
}

fn yes_no(b: bool) -> &'static str { if b { "yes" } else { "no" } }
