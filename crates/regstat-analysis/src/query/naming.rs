//! Generated series names.

use std::collections::BTreeSet;

use regstat_core::types::{EntityType, FilterConfiguration};

/// `"<metric> of <entity> [<filter>: <n>, ..., years: <range>]"`.
pub fn generate_name(config: &FilterConfiguration) -> String {
    let entity = match config.entity {
        EntityType::Vehicle => "vehicles",
        EntityType::License => "licenses",
    };
    let mut name = format!("{} of {entity}", config.metric.label());

    let mut parts = Vec::new();
    let sets: [(&str, usize); 16] = [
        ("regions", config.admin_regions.len()),
        ("MRCs", config.mrcs.len()),
        ("municipalities", config.municipalities.len()),
        ("classes", config.vehicle_classes.len()),
        ("types", config.vehicle_types.len()),
        ("makes", config.makes.len()),
        ("models", config.models.len()),
        ("colors", config.colors.len()),
        ("model years", config.model_years.len()),
        ("fuels", config.fuel_types.len()),
        ("age ranges", config.age_ranges.len()),
        ("license types", config.license_types.len()),
        ("age groups", config.age_groups.len()),
        ("genders", config.genders.len()),
        ("experience", config.experience_levels.len()),
        ("license classes", config.license_classes.len()),
    ];
    for (label, n) in sets {
        if n > 0 {
            parts.push(format!("{label}: {n}"));
        }
    }
    if let Some(years) = year_span(&config.years) {
        parts.push(years);
    }
    if config.limit_to_curated_years {
        parts.push("curated only".to_string());
    }

    if !parts.is_empty() {
        name.push_str(" [");
        name.push_str(&parts.join(", "));
        name.push(']');
    }
    name
}

fn year_span(years: &BTreeSet<i64>) -> Option<String> {
    let first = *years.first()?;
    let last = *years.last()?;
    Some(if first == last {
        format!("year: {first}")
    } else if (last - first) as usize + 1 == years.len() {
        format!("years: {first}-{last}")
    } else {
        let list: Vec<String> = years.iter().map(i64::to_string).collect();
        format!("years: {}", list.join("/"))
    })
}

#[cfg(test)]
mod tests {
    use regstat_core::types::Metric;

    use super::*;

    #[test]
    fn unfiltered_name() {
        let cfg = FilterConfiguration::new(EntityType::License, Metric::Count);
        assert_eq!(generate_name(&cfg), "Count of licenses");
    }

    #[test]
    fn filters_and_years_summarized() {
        let mut cfg = FilterConfiguration::new(EntityType::Vehicle, Metric::Count)
            .with_years(2017..=2022);
        cfg.makes.extend([3, 9]);
        assert_eq!(
            generate_name(&cfg),
            "Count of vehicles [makes: 2, years: 2017-2022]"
        );

        let cfg = cfg.with_years([2011, 2015]);
        assert!(generate_name(&cfg).ends_with("years: 2011/2015]"));
    }
}
