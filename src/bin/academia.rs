use academia::scraper::CoursePage;
use academia::utils::infer_student_year;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::process;

#[derive(Parser)]
#[command(name = "academia")]
#[command(about = "An SRM Academia course-page scraper", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and decode the enrolled-course table
    Courses {
        #[arg(long, help = "Session cookie obtained from a portal login")]
        cookie: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format (text or json)"
        )]
        format: OutputFormat,
    },
    /// Infer a student's year of study from a registration number
    Year {
        #[arg(help = "Registration number, e.g. RA2202211012345")]
        reg_number: String,

        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            help = "Date to evaluate against (defaults to today)"
        )]
        date: Option<String>,
    },
}

fn parse_date(date_str: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", date_str))
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Courses { cookie, format } => {
            let page = match CoursePage::new(&cookie) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error creating scraper: {}", e);
                    process::exit(1);
                }
            };

            let (response, err) = page.fetch_courses_report().await;

            match format {
                // JSON output carries failures in the body (status/error
                // fields), matching what the portal API's clients expect.
                OutputFormat::Json => match serde_json::to_string_pretty(&response) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing to JSON: {}", e);
                        process::exit(1);
                    }
                },
                OutputFormat::Text => {
                    if let Some(ref e) = err {
                        eprintln!("Error fetching courses: {}", e);
                        process::exit(1);
                    }

                    if !response.reg_number.is_empty() {
                        println!("Registration number: {}", response.reg_number);
                    }
                    println!("Successfully fetched {} courses", response.courses.len());
                    println!();

                    for (i, course) in response.courses.iter().enumerate() {
                        println!(
                            "{}. {} - {} ({}, slot {}, {}, room {})",
                            i + 1,
                            course.code,
                            course.title,
                            course.slot_type,
                            course.slot,
                            course.faculty,
                            course.room
                        );
                    }
                }
            }

            if err.is_some() {
                process::exit(1);
            }
        }
        Commands::Year { reg_number, date } => {
            let today = match date {
                Some(ref s) => match parse_date(s) {
                    Ok(d) => d,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                },
                None => Local::now().date_naive(),
            };

            match infer_student_year(&reg_number, today) {
                Some(year) => println!("Year of study: {}", year),
                None => {
                    eprintln!(
                        "Error: registration number '{}' has no admission-year digits",
                        reg_number
                    );
                    process::exit(1);
                }
            }
        }
    }
}
