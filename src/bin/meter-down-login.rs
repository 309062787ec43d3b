#![cfg(feature = "cli")]

use clap::{Arg, Command};
use log::error;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use meter_down::phone::national_digits;
use meter_down::prelude::*;

/// Prints navigation intents instead of switching screens
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        println!("-> {}", route);
    }

    fn go_back(&self) {
        println!("<- back");
    }
}

fn prompt(flow: &LoginFlow) {
    let state = flow.state();
    let t = flow.strings();
    match state.step {
        Step::Input => {
            println!("\n{} [{}]", t.enter_mobile, state.locale.to_string().to_uppercase());
            println!("{} (+91) {}", t.mobile_number, national_digits(&state.phone_number));
            println!("{}", t.consent_text);
            println!("type digits, then an empty line to {}", t.continue_label);
        }
        Step::CodeEntry => {
            println!("\n{} ({})", t.otp, state.phone_number);
            println!("type the code, then an empty line to {}", t.verify_otp);
            println!(":change  {}", t.change_number);
        }
    }
    println!(":lang  :quit");
}

#[tokio::main]
async fn main() {
    let matches = Command::new("meter-down-login")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sign in to Meter Down with a phone number and SMS code")
        .arg(
            Arg::new("locale")
                .short('l')
                .long("locale")
                .value_name("TAG")
                .help("Display language (en or hi)")
                .takes_value(true),
        )
        .arg(
            Arg::new("phone")
                .short('p')
                .long("phone")
                .value_name("NUMBER")
                .help("Prefill the ten-digit mobile number")
                .takes_value(true),
        )
        .get_matches();

    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            eprintln!("Missing Supabase environment variables. Please check your .env file.");
            std::process::exit(1);
        }
    };
    if let Some(tag) = matches.value_of("locale") {
        match tag.parse::<Locale>() {
            Ok(locale) => config.options = config.options.clone().with_default_locale(locale),
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(2);
            }
        }
    }

    let app = match MeterDown::new(config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    let flow = app.login(Arc::new(TerminalNavigator));
    if let Some(phone) = matches.value_of("phone") {
        if let Err(err) = flow.set_phone_number(phone) {
            eprintln!("{}", err.user_message());
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(&flow);
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        let result = match (line, flow.state().step) {
            (":quit", _) => {
                flow.leave();
                break;
            }
            (":lang", _) => {
                flow.toggle_locale();
                Ok(())
            }
            (":change", _) => flow.restart_phone_entry(),
            ("", Step::Input) => {
                println!("{}", flow.strings().loading);
                flow.request_code().await
            }
            ("", Step::CodeEntry) => {
                println!("{}", flow.strings().loading);
                flow.verify_code().await.map(|_| ())
            }
            (text, Step::Input) => flow.set_phone_number(text),
            (text, Step::CodeEntry) => flow.set_code(text),
        };

        if let Err(err) = result {
            eprintln!("Error: {}", err.user_message());
        }
        if flow.is_detached() {
            break;
        }
        prompt(&flow);
    }

    if let Some(session) = app.auth().and_then(|auth| auth.get_session()) {
        println!("signed in as {}", session.user.phone.unwrap_or(session.user.id));
    }
}
