// src/draw.rs
use chrono::{Datelike, Local, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::data_types::{CrystalRecord, DailyFocus, DrawOutcome, RecordSource};
use crate::error::{DrawError, Result};

/// The owner's natal chart; the focus table points each weekday at one of
/// these placements.
struct NatalChart {
    sun: &'static str,
    moon: &'static str,
    rising: &'static str,
    venus: &'static str,
    mars: &'static str,
    mercury: &'static str,
}

const USER_PROFILE: NatalChart = NatalChart {
    sun: "巨蟹座",
    moon: "雙子座",
    rising: "處女座",
    venus: "巨蟹座",
    mars: "天秤座",
    mercury: "巨蟹座",
};

/// Verse corpus for the closing fortune line.
pub const HYAKUNIN_ISSHU: &[&str] = &[
    "秋收稻岸宿，過夜搭茅屋。",
    "春過夏已至，白衣曬香山。",
    "長夜如尾羽，孤枕待天明。",
    "田子浦前望，富士雪紛紛。",
    "深山紅葉裡，聞鹿最悲秋。",
    "鵲橋霜似雪，夜深天欲明。",
    "仰望東天月，三笠山上明。",
    "吾庵都城外，世人謂憂山。",
    "花色已轉移，此身虛度世。",
    "相逢坂關口，知與不知逢。",
];

/// Keeps only drawable rows, in their original sheet order.
pub fn filter_active(records: Vec<CrystalRecord>) -> Vec<CrystalRecord> {
    records
        .into_iter()
        .filter(CrystalRecord::is_active)
        .collect()
}

/// Weekday is 0-based from Monday. Indexes outside 0..=6 cannot come from a
/// calendar date but still resolve, to the generic tuple.
pub fn focus_for_weekday(weekday: u32) -> DailyFocus {
    match weekday {
        0 => DailyFocus {
            planet: "月亮 (雙子)",
            natal_sign: USER_PROFILE.moon,
            lucky_colors: &["blue", "white", "all"],
        },
        1 => DailyFocus {
            planet: "火星 (天秤)",
            natal_sign: USER_PROFILE.mars,
            lucky_colors: &["red", "pink", "brown"],
        },
        2 => DailyFocus {
            planet: "水星 (巨蟹)",
            natal_sign: USER_PROFILE.mercury,
            lucky_colors: &["blue", "gray"],
        },
        3 => DailyFocus {
            planet: "木星 (幸運日)",
            natal_sign: USER_PROFILE.sun,
            lucky_colors: &["yellow", "purple", "orange"],
        },
        4 => DailyFocus {
            planet: "金星 (巨蟹)",
            natal_sign: USER_PROFILE.venus,
            lucky_colors: &["pink", "green", "white"],
        },
        5 => DailyFocus {
            planet: "土星 (處女)",
            natal_sign: USER_PROFILE.rising,
            lucky_colors: &["black", "brown", "earth"],
        },
        6 => DailyFocus {
            planet: "太陽 (巨蟹)",
            natal_sign: USER_PROFILE.sun,
            lucky_colors: &["gold", "white", "red"],
        },
        _ => DailyFocus {
            planet: "宇宙",
            natal_sign: "全星座",
            lucky_colors: &["all"],
        },
    }
}

pub fn daily_focus(date: NaiveDate) -> DailyFocus {
    focus_for_weekday(date.weekday().num_days_from_monday())
}

/// Draws 2 or 3 distinct records uniformly from the pool, capped at the pool
/// size, in shuffled order. An empty pool yields an empty selection.
pub fn select_crystals<R: Rng + ?Sized>(
    pool: &[CrystalRecord],
    rng: &mut R,
) -> Vec<CrystalRecord> {
    let daily_count = rng.gen_range(2..=3usize);
    let mut picks: Vec<CrystalRecord> = pool
        .choose_multiple(rng, daily_count.min(pool.len()))
        .cloned()
        .collect();
    picks.shuffle(rng);
    picks
}

pub fn pick_quotation<R: Rng + ?Sized>(
    corpus: &'static [&'static str],
    rng: &mut R,
) -> Result<&'static str> {
    corpus
        .choose(rng)
        .copied()
        .ok_or_else(|| DrawError::Processing {
            message: "quotation corpus is empty".to_string(),
        })
}

/// One full trigger: fetch fresh records, filter, resolve today's focus,
/// sample the picks and close with a fortune line.
pub async fn run_draw(source: Arc<dyn RecordSource>) -> Result<DrawOutcome> {
    let records = source.fetch_records().await?;
    let pool = filter_active(records);
    tracing::info!(pool = pool.len(), "inventory fetched");

    let mut rng = rand::thread_rng();
    let focus = daily_focus(Local::now().date_naive());
    let picks = select_crystals(&pool, &mut rng);
    let quotation = pick_quotation(HYAKUNIN_ISSHU, &mut rng)?;

    tracing::info!(picks = picks.len(), planet = focus.planet, "draw complete");
    Ok(DrawOutcome {
        focus,
        picks,
        quotation,
        pool_size: pool.len(),
    })
}
