use frizbee::Config;

use crate::PREFILTER_ENABLE_THRESHOLD;

/// Builds fuzzy matching options for the provided query and dataset size.
pub fn config_for_query(query: &str, dataset_len: usize) -> Config {
    let mut config = Config {
        prefilter: false,
        ..Config::default()
    };

    let length = query.chars().count();
    let mut allowed_typos: u16 = match length {
        0 | 1 => 0,
        2..=4 => 1,
        5..=7 => 2,
        8..=12 => 3,
        _ => 4,
    };
    if let Ok(max_reasonable) = u16::try_from(length.saturating_sub(1)) {
        allowed_typos = allowed_typos.min(max_reasonable);
    }

    if dataset_len >= PREFILTER_ENABLE_THRESHOLD {
        config.prefilter = true;
        config.max_typos = Some(allowed_typos);
    } else {
        config.max_typos = None;
    }

    // Ranking is done by the catalog so ties keep insertion order.
    config.sort = false;

    config
}
