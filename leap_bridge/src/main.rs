//! leap_bridge — interactive entry point.

use leap_bridge::app::{run, AppConfig};
use std::io::{self, Write};
use std::time::Duration;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       Leap Bridge — Fingertip Transforms for RAS Scenes      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = if args.is_empty() {
        configure_interactively()
    } else {
        parse_args(&args)
    };

    println!();
    println!("  Opening viewer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> AppConfig {
    let mut cfg = AppConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--quick" => {}
            "--auto-create" => cfg.auto_create = true,
            "--interval" => {
                i += 1;
                let ms: u64 = args
                    .get(i)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100);
                cfg.interval = Duration::from_millis(ms.max(10).min(2000));
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Usage: leap_bridge [--quick] [--auto-create] [--interval <ms>]");
                std::process::exit(2);
            }
        }
        i += 1;
    }
    cfg
}

fn configure_interactively() -> AppConfig {
    let answer = read_line("  Auto-create transforms? y/N: ");
    let auto_create = matches!(answer.trim(), "y" | "Y" | "yes");
    if auto_create {
        println!("  (transforms will be created on demand — not recommended when they already exist)");
    }

    let interval_ms: u64 = read_line("  Poll interval ms (default 100): ")
        .trim()
        .parse()
        .unwrap_or(100);

    AppConfig {
        auto_create,
        interval: Duration::from_millis(interval_ms.max(10).min(2000)),
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
