use once_cell::sync::Lazy;
use regex::Regex;

/// Longest sanitized filename segment a token may carry.
pub const MAX_SANITIZED_CHARS: usize = 50;

/// Recurring filename fragments and their fixed ASCII spelling, applied in
/// order before the character filter. Encode and decode both go through
/// [`sanitize_filename`], so this is the only copy of the table.
pub const TRANSLITERATIONS: &[(&str, &str)] = &[
    ("ДИАГНОСТИКА", "DIAGNOSTIKA"),
    ("ЗАТУХАНИЯ", "ZATUHANIYA"),
    ("НАСТРОЙКА", "NASTROYKA"),
    ("РОУТЕРОВ", "ROUTEROV"),
    ("Базовая", "Bazovaya"),
    ("ГИБРИДЫ", "GIBRIDY"),
    ("ПОДКЛЮЧЕНИЕ", "PODKLYUCHENIE"),
    ("ЧАСТНОМ", "CHASTNOM"),
    ("СЕКТОРЕ", "SEKTORE"),
    ("КОММЕРЧЕСКИХ", "KOMMERCHESKIH"),
    ("ОБЪЕКТОВ", "OBYEKTOV"),
    ("ДЕМОНСТРАЦИЯ", "DEMONSTRATSIYA"),
    ("УСЛУГ", "USLUG"),
    ("КЛИЕНТУ", "KLIENTU"),
    ("ПРОСТЫЕ", "PROSTYE"),
    ("СВАРОЧНЫЕ", "SVAROCHNYE"),
    ("АППАРАТЫ", "APPARATY"),
    ("ИЗМЕРИТЕЛИ", "IZMERITELI"),
    ("ОПТИЧЕСКОЙ", "OPTICHESKOY"),
    ("МОЩНОСТИ", "MOSHCHNOSTI"),
    ("СКАЛЫВАТЕЛЯ", "SKALYVATELEY"),
    ("СТРИППЕРА", "STRIPPERA"),
    ("РЕШЕНИЯ", "RESHENIYA"),
    ("ПРОБЛЕМ", "PROBLEM"),
    ("МКД", "MKD"),
    ("Быстрый", "Bystryy"),
    ("справочник", "spravochnik"),
    ("Работа", "Rabota"),
    ("№", "N"),
];

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("static regex must compile"));

/// Transliterates known fragments, drops everything outside `[A-Za-z0-9_]`
/// and truncates to `limit`, never above [`MAX_SANITIZED_CHARS`].
pub fn sanitize_filename(filename: &str, limit: usize) -> String {
    let mut text = filename.to_string();
    for (from, to) in TRANSLITERATIONS {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }
    let mut safe = UNSAFE_CHARS.replace_all(&text, "").into_owned();
    // output is ASCII: byte length == char count
    safe.truncate(limit.min(MAX_SANITIZED_CHARS));
    safe
}
