use colored::*;

pub fn print_banner() {
    let banner = r#"
 __        __            _
 \ \      / /_ _ _ __ __| | ___ _ __
  \ \ /\ / / _` | '__/ _` |/ _ \ '_ \
   \ V  V / (_| | | | (_| |  __/ | | |
    \_/\_/ \__,_|_|  \__,_|\___|_| |_|
    "#;

    println!("{}", banner.bright_cyan().bold());
    println!("{}", "   The checkpoint between your prompt and the model".bright_white().italic());
    println!("{}", "   ================================================".bright_black());
    println!();
}

pub fn print_startup_info(service_domain: &str, model: &str, thresholds: &str) {
    print_step(&format!("Intel/redact/audit services at *.{}", service_domain));
    print_step(&format!("Completion model: {}", model));
    print_step(&format!("Malice thresholds: {}", thresholds));
}

pub fn print_step(msg: &str) {
    println!("{} {}", "➜".bright_blue().bold(), msg);
    tracing::info!("STEP: {}", msg);
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✔".bright_green().bold(), msg);
    tracing::info!("SUCCESS: {}", msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".bright_yellow().bold(), msg);
    tracing::warn!("WARNING: {}", msg);
}

pub fn print_error(msg: &str) {
    println!("{} {}", "✘".bright_red().bold(), msg);
    tracing::error!("ERROR: {}", msg);
}
