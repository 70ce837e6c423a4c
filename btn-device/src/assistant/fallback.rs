use crate::catalog::Catalog;
use std::fmt::Write;

const DEFAULT_REPLY: &str = "Xin lỗi, tôi đang gặp sự cố kỹ thuật. Bạn có thể thử hỏi:\n\n\
• 'Có món gì cay?'\n\
• 'Gợi ý món nhẹ'\n\
• 'Món chính nào ngon?'\n\
• 'Đồ uống có gì?'\n\n\
Hoặc liên hệ nhân viên để được hỗ trợ tốt hơn!";

/// Offline answer used when the generator cannot be reached
///
/// Questions about spicy or light food get a list from the menu; anything
/// else gets the default apology with example questions.
pub fn fallback_reply(question: &str, catalog: &Catalog) -> String {
    let input = question.to_lowercase();

    if input.contains("cay") || input.contains("spicy") {
        let dishes = catalog.spicy();
        if !dishes.is_empty() {
            let mut reply = String::from("Đây là những món cay tôi gợi ý:\n\n");
            for (i, dish) in dishes.iter().enumerate() {
                let _ = write!(
                    reply,
                    "{}. {}\n   Giá: {}\n   {}\n\n",
                    i + 1,
                    dish.name,
                    format_vnd(dish.price),
                    dish.description
                );
            }
            return reply;
        }
    }

    if input.contains("nhẹ") || input.contains("healthy") {
        let dishes = catalog.light();
        if !dishes.is_empty() {
            let mut reply = String::from("Những món nhẹ nhàng cho bạn:\n\n");
            for (i, dish) in dishes.iter().enumerate() {
                let _ = write!(
                    reply,
                    "{}. {}\n   Calories: {} kcal\n   Giá: {}\n\n",
                    i + 1,
                    dish.name,
                    dish.calories,
                    format_vnd(dish.price)
                );
            }
            return reply;
        }
    }

    DEFAULT_REPLY.to_string()
}

/// 70000 -> "70.000đ"
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}đ", sign, grouped)
}
