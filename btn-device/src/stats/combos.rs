//! Combo views: today's combos, the lunch combos and the event banner
//!
//! Combos are assembled from the catalog on every call. Where a combo needs
//! "any" dishes it walks the catalog starting at an offset derived from the
//! date, so the selection changes day to day but is fixed for a given day.

use crate::catalog::Catalog;
use chrono::{Datelike, NaiveDate, Weekday};
use shared::models::{Combo, Dish};

/// Price of one dish inside a today combo
pub const COMBO_UNIT_PRICE: i64 = 65000;

/// Calorie ceiling for the healthy combo (exclusive)
const HEALTHY_CALORIES: i32 = 350;
/// Dish price ceiling for the budget combo (exclusive)
const BUDGET_PRICE: i64 = 50000;

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Banner shown above today's combos
///
/// Seasonal messages (mid-autumn, Christmas, new year) win over the
/// day-of-week ones.
pub fn event_message(date: NaiveDate) -> &'static str {
    let (month, day) = (date.month(), date.day());
    if month == 9 && (10..=17).contains(&day) {
        "🌕 Sắp tới là Tết Trung Thu, hãy thưởng thức những món đặc biệt cùng gia đình!"
    } else if month == 12 && day >= 20 {
        "🎄 Mùa Giáng Sinh đang đến, cùng chia sẻ bữa ăn ấm áp!"
    } else if month == 1 && day <= 15 {
        "🧧 Chúc Mừng Năm Mới! Khởi đầu năm với những món ăn may mắn!"
    } else if is_weekend(date) {
        "🎉 Cuối tuần vui vẻ! Thời gian hoàn hảo để thử những combo mới!"
    } else if date.weekday() == Weekday::Mon {
        "💪 Thứ Hai năng lượng! Bắt đầu tuần mới với những món ăn bổ dưỡng!"
    } else if date.weekday() == Weekday::Fri {
        "🎊 Thứ Sáu rồi! Chuẩn bị cho cuối tuần với những combo thú vị!"
    } else {
        "☀️ Chúc bạn có một ngày tuyệt vời với những món ăn ngon!"
    }
}

/// Catalog order, rotated by the day
fn rotated(catalog: &Catalog, date: NaiveDate) -> impl Iterator<Item = &Dish> {
    let dishes = catalog.all();
    let offset = if dishes.is_empty() {
        0
    } else {
        date.num_days_from_ce().unsigned_abs() as usize % dishes.len()
    };
    dishes[offset..].iter().chain(dishes[..offset].iter())
}

/// `count` dishes: the preferred ones first, topped up from the day's
/// rotation without repeats
fn pick(preferred: Vec<&Dish>, count: usize, catalog: &Catalog, date: NaiveDate) -> Vec<Dish> {
    let mut picks: Vec<&Dish> = preferred.into_iter().take(count).collect();
    for dish in rotated(catalog, date) {
        if picks.len() >= count {
            break;
        }
        if !picks.iter().any(|p| p.id == dish.id) {
            picks.push(dish);
        }
    }
    picks.into_iter().cloned().collect()
}

fn today_combo(
    id: &str,
    title: &str,
    description: &str,
    badge: &str,
    dishes: Vec<Dish>,
    price: i64,
    original_price: i64,
) -> Combo {
    Combo {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        badge: badge.to_string(),
        dishes,
        price,
        original_price,
        prep_time: None,
        rating: None,
    }
}

/// The four combos of the day
///
/// | id | dishes | price | original |
/// |----|--------|-------|----------|
/// | `combo_today_1` | 3 from the day's rotation | 3 × 65000 | + 20000 |
/// | `combo_today_2` | 2 spicy | 2 × 65000 | + 15000 |
/// | `combo_today_3` | 3 under 350 kcal | 3 × 65000 | + 18000 |
/// | `combo_today_4` | 2 under 50000 | 2 × 65000 − 10000 | 2 × 65000 |
///
/// Short categories are topped up from the rotation.
pub fn today_combos(catalog: &Catalog, date: NaiveDate) -> Vec<Combo> {
    let weekend = is_weekend(date);
    let (title, description, badge) = if weekend {
        (
            "Combo Gia Đình Cuối Tuần",
            "Phù hợp cho gia đình 4-6 người, thưởng thức cùng nhau trong không khí ấm cúng cuối tuần",
            "Gia đình",
        )
    } else {
        (
            "Combo Năng Lượng Tuần Mới",
            "Cung cấp đủ năng lượng cho một ngày làm việc hiệu quả, cân bằng dinh dưỡng và hương vị",
            "Năng lượng",
        )
    };

    let healthy: Vec<&Dish> = catalog
        .all()
        .iter()
        .filter(|d| d.calories > 0 && d.calories < HEALTHY_CALORIES)
        .collect();
    let budget: Vec<&Dish> = catalog
        .all()
        .iter()
        .filter(|d| d.price > 0 && d.price < BUDGET_PRICE)
        .collect();

    vec![
        today_combo(
            "combo_today_1",
            title,
            description,
            badge,
            pick(Vec::new(), 3, catalog, date),
            3 * COMBO_UNIT_PRICE,
            3 * COMBO_UNIT_PRICE + 20000,
        ),
        today_combo(
            "combo_today_2",
            "Combo Đặc Sản Ấn Độ",
            "Trải nghiệm hương vị đậm đà của ẩm thực Ấn Độ truyền thống, phù hợp cho những ai yêu thích vị cay nồng",
            "Đặc sản",
            pick(catalog.spicy(), 2, catalog, date),
            2 * COMBO_UNIT_PRICE,
            2 * COMBO_UNIT_PRICE + 15000,
        ),
        today_combo(
            "combo_today_3",
            "Combo Healthy & Light",
            "Lựa chọn hoàn hảo cho những ai quan tâm đến sức khỏe, ít calories nhưng vẫn đầy đủ dinh dưỡng",
            "Healthy",
            pick(healthy, 3, catalog, date),
            3 * COMBO_UNIT_PRICE,
            3 * COMBO_UNIT_PRICE + 18000,
        ),
        today_combo(
            "combo_today_4",
            "Combo Tiết Kiệm",
            "Giá cả phải chăng nhưng vẫn đảm bảo chất lượng và hương vị, phù hợp cho sinh viên và người trẻ",
            "Tiết kiệm",
            pick(budget, 2, catalog, date),
            2 * COMBO_UNIT_PRICE - 10000,
            2 * COMBO_UNIT_PRICE,
        ),
    ]
}

/// Slot of a lunch combo: the n-th dish of a catalog category
type Slot = (&'static str, usize);

struct LunchCombo {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    badge: &'static str,
    price: i64,
    original_price: i64,
    rating: f32,
    prep_time: &'static str,
    slots: &'static [Slot],
}

const LUNCH_COMBOS: [LunchCombo; 6] = [
    LunchCombo {
        id: "combo1",
        title: "Combo Ấn Độ Truyền Thống",
        description: "Bữa trưa đậm đà hương vị Ấn Độ với các món chính và đồ uống",
        badge: "Phổ biến",
        price: 120000,
        original_price: 140000,
        rating: 4.8,
        prep_time: "35-40 phút",
        slots: &[("Lunch", 0), ("Beverage", 0)],
    },
    LunchCombo {
        id: "combo2",
        title: "Combo Biryani Đặc Biệt",
        description: "Cơm Biryani thơm ngon với đồ uống và món khai vị",
        badge: "Premium",
        price: 150000,
        original_price: 170000,
        rating: 4.9,
        prep_time: "45-50 phút",
        slots: &[("Lunch", 0), ("Appetizer", 0), ("Beverage", 1)],
    },
    LunchCombo {
        id: "combo3",
        title: "Combo Chay Healthy",
        description: "Bữa ăn nhẹ nhàng với Dal và đồ uống tươi mát",
        badge: "Healthy",
        price: 85000,
        original_price: 100000,
        rating: 4.6,
        prep_time: "25-30 phút",
        slots: &[("Lunch", 1), ("Beverage", 0)],
    },
    LunchCombo {
        id: "combo4",
        title: "Combo Gà Tikka Masala",
        description: "Món gà đặc trưng với hương vị đậm đà, phù hợp cho bữa trưa",
        badge: "Đặc biệt",
        price: 95000,
        original_price: 110000,
        rating: 4.7,
        prep_time: "40-45 phút",
        slots: &[("Dinner", 1), ("Beverage", 1)],
    },
    LunchCombo {
        id: "combo5",
        title: "Combo Express",
        description: "Nhanh gọn với Samosa và đồ uống, phù hợp giờ trưa bận rộn",
        badge: "Nhanh",
        price: 60000,
        original_price: 75000,
        rating: 4.4,
        prep_time: "15-20 phút",
        slots: &[("Appetizer", 0), ("Beverage", 1)],
    },
    LunchCombo {
        id: "combo6",
        title: "Combo Ngọt Ngào",
        description: "Kết hợp món chính với tráng miệng truyền thống",
        badge: "Ngọt ngào",
        price: 110000,
        original_price: 130000,
        rating: 4.5,
        prep_time: "35-40 phút",
        slots: &[("Lunch", 1), ("Dessert", 0), ("Beverage", 0)],
    },
];

/// The lunch combo menu
///
/// Each combo names its dishes by category position; positions the catalog
/// cannot fill are left out, and a combo left with no dish is dropped.
pub fn lunch_combos(catalog: &Catalog) -> Vec<Combo> {
    LUNCH_COMBOS
        .iter()
        .filter_map(|entry| {
            let dishes: Vec<Dish> = entry
                .slots
                .iter()
                .filter_map(|(category, n)| catalog.by_category(category).get(*n).map(|d| (*d).clone()))
                .collect();
            if dishes.is_empty() {
                return None;
            }
            Some(Combo {
                id: entry.id.to_string(),
                title: entry.title.to_string(),
                description: entry.description.to_string(),
                badge: entry.badge.to_string(),
                dishes,
                price: entry.price,
                original_price: entry.original_price,
                prep_time: Some(entry.prep_time.to_string()),
                rating: Some(entry.rating),
            })
        })
        .collect()
}

/// Combos matching a search box keyword; a blank keyword keeps all
pub fn search_combos<'a>(combos: &'a [Combo], keyword: &str) -> Vec<&'a Combo> {
    combos.iter().filter(|c| c.matches(keyword)).collect()
}
