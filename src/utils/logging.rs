//! Система логирования с настройкой уровней через переменные окружения
//! Использует env_logger для гибкого управления логами

use std::env;

/// Инициализация системы логирования
///
/// Уровень берется из RUST_LOG, иначе из `default_level` (обычно `log_level` из конфига):
/// - RUST_LOG=warn - только отклоненные запросы и ошибки
/// - RUST_LOG=info - сделки и изменения настроек (по умолчанию)
/// - RUST_LOG=debug - плюс сгенерированные прогнозы
///
/// Можно указать для конкретного модуля:
/// - RUST_LOG=crypto_dashboard::settings=debug
pub fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false)
        .init();

    log::info!("✅ Система логирования инициализирована");
    log::info!("📝 Уровень логирования: {}", get_log_level(default_level));
}

/// Получить текущий уровень логирования
pub fn get_log_level(default_level: &str) -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string())
}
