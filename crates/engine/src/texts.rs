//! User-facing message bodies (Telegram HTML).

pub const DOCUMENT_UNAVAILABLE: &str = "❌ Файл не найден. Обратитесь к администратору.";

pub const CATEGORY_UNAVAILABLE: &str = "❌ Категория не найдена. Открой /all ещё раз.";

pub const BUTTONS_UNAVAILABLE: &str = "❌ Ошибка создания кнопок для найденных файлов";

pub const CONTACTS_MISSING: &str = "📞 Контакты пока не указаны.";

pub const BACK_LABEL: &str = "⬅️ Назад";

pub const SHORT_INPUT: &str = "💡 <b>Автопоиск активен!</b>

Просто напиши слово для поиска инструкций:
• <b>затухание</b> - диагностика GPON
• <b>wifi</b> - настройка роутеров
• <b>ont</b> - оборудование
• <b>сварка</b> - качество соединений

Или используй команды: /all /quick /contacts";

pub const UNKNOWN_COMMAND: &str = "❓ <b>Неизвестная команда</b>

<b>Доступные команды:</b>
🔍 /search [слово] - поиск PDF
📚 /all - все инструкции
⚡ /quick - быстрый справочник
📞 /contacts - контакты

<b>💡 Можно просто писать слова без команд:</b>
затухание, wifi, ont, сварка, мкд";

pub const SEARCH_USAGE: &str = "🔍 <b>Поиск:</b> /search [слово] или просто напиши слово

• <b>Модемы:</b> онт, ону, модем, коробочка
• <b>WiFi:</b> вайфай, роутер, беспроводная, пароль
• <b>Диагностика:</b> затухание, сигнал, дбм
• <b>Инструменты:</b> сварка, аппарат, скалыватель, стриппер
• <b>Подключения:</b> частный, дом, мкд, квартира, офис

<b>Примеры:</b>
/search модем
или просто: <b>вайфай</b>";

const POPULAR_KEYWORDS: &str = "<b>💡 Попробуй популярные слова:</b>
• <b>Модемы:</b> онт, ону, модем, коробочка
• <b>WiFi:</b> вайфай, роутер, беспроводная, пароль
• <b>Диагностика:</b> затухание, сигнал, дбм
• <b>Сварка:</b> аппарат, скалыватель, стриппер
• <b>Подключения:</b> частный, дом, мкд, квартира, офис";

pub fn welcome(user_name: &str, title: &str) -> String {
    format!(
        "🛠️ <b>База знаний {title}</b>

Привет, {user}!

<b>🎯 АВТОПОИСК:</b>
Напиши <i>любое</i> слово - я найду инструкции:
• <b>онт, модем</b> → оборудование
• <b>вайфай, роутер</b> → WiFi настройки
• <b>затухание, сигнал</b> → диагностика
• <b>сварка, скалыватель</b> → инструменты
• <b>частный, мкд, офис</b> → подключения

<b>📋 КОМАНДЫ:</b>
📚 /all - все категории инструкций
⚡ /quick - быстрый справочник
📞 /contacts - контакты",
        title = escape_html(title),
        user = escape_html(user_name),
    )
}

/// Free-text miss: guidance plus optional "did you mean" keywords.
pub fn no_results(query: &str, hints: &[String]) -> String {
    let mut text = format!(
        "🔍 <b>Ничего не найдено по запросу:</b> '{}'\n\n",
        escape_html(query)
    );
    if !hints.is_empty() {
        let hints: Vec<String> = hints
            .iter()
            .map(|hint| format!("<b>{}</b>", escape_html(hint)))
            .collect();
        text.push_str(&format!("🤔 Возможно, ты имел в виду: {}\n\n", hints.join(", ")));
    }
    text.push_str(POPULAR_KEYWORDS);
    text.push_str("\n\nИли используй /all для просмотра всех категорий");
    text
}

/// `/search` miss. No suggestions.
pub fn not_found(query: &str) -> String {
    format!("❌ Не найдено по запросу: {}", escape_html(query))
}

pub fn command_results(count: usize) -> String {
    format!("🔍 <b>Найдено {count} файлов:</b>")
}

pub fn auto_results(query: &str, count: usize) -> String {
    format!(
        "🎯 <b>Автопоиск по '{}':</b>\nНайдено {count} файлов:",
        escape_html(query)
    )
}

pub fn file_missing(filename: &str) -> String {
    format!(
        "❌ Файл не найден на сервере: {}\nОбратитесь к администратору.",
        escape_html(filename)
    )
}

pub fn category_header(name: &str) -> String {
    format!("<b>{}</b>\n\nВыбери PDF:", escape_html(name))
}

pub fn document_caption(description: &str) -> String {
    format!("📄 <b>{}</b>", escape_html(description))
}

/// Escape the three characters Telegram's HTML mode treats as markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>a & b</b>"), "&lt;b&gt;a &amp; b&lt;/b&gt;");
        assert_eq!(escape_html("Вася"), "Вася");
    }

    #[test]
    fn welcome_escapes_user_name() {
        let text = welcome("<script>", "Homeline");
        assert!(text.contains("&lt;script&gt;"));
        assert!(!text.contains("<script>"));
    }

    #[test]
    fn hints_only_when_present() {
        assert!(!no_results("qq", &[]).contains("Возможно"));
        assert!(no_results("роутр", &["роутер".to_string()]).contains("<b>роутер</b>"));
    }
}
