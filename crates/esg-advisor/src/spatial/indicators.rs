use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::assessment::LocationContext;

pub const TOP_INDICATOR_COUNT: usize = 3;

/// EJScreen demographic percentile columns.
pub const SOCIAL_INDICATORS: &[(&str, &str)] = &[
    ("P_PEOPCOLO", "% People of Color"),
    ("P_LOWINCPC", "% Low Income"),
    ("P_UNEMPPCT", "% Unemployed"),
    ("P_DISABILI", "% Persons with Disabilities"),
    ("P_LINGISOP", "% Limited English Speaking"),
    ("P_LESSHSPC", "% Less than High School Education"),
    ("P_UNDER5PC", "% Under Age 5"),
    ("P_OVER64PC", "% Over Age 64"),
    ("P_LIFEEXPP", "Low Life Expectancy"),
];

/// EJScreen environmental burden percentile columns.
pub const ENVIRONMENTAL_INDICATORS: &[(&str, &str)] = &[
    ("P_PM25", "Particulate Matter 2.5"),
    ("P_OZONE", "Ozone"),
    ("P_DSLPM", "Diesel Particulate Matter"),
    ("P_RSEI_AIR", "Toxic Releases to Air"),
    ("P_PTRAF", "Traffic Proximity"),
    ("P_LDPNT", "Lead Paint"),
    ("P_PNPL", "Superfund Proximity"),
    ("P_PRMP", "RMP Facility Proximity"),
    ("P_PTSDF", "Hazardous Waste Proximity"),
    ("P_UST", "Underground Storage Tanks"),
    ("P_PWDIS", "Wastewater Discharge"),
    ("P_NO2", "Nitrogen Dioxide (NO2)"),
    ("P_DWATER", "Drinking Water Non-Compliance"),
];

pub fn all_indicator_codes() -> Vec<&'static str> {
    SOCIAL_INDICATORS
        .iter()
        .chain(ENVIRONMENTAL_INDICATORS)
        .map(|(code, _)| *code)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorAverage {
    pub code: &'static str,
    pub label: &'static str,
    pub average: f64,
}

fn top_indicators(
    averages: &BTreeMap<String, f64>,
    catalog: &[(&'static str, &'static str)],
    count: usize,
) -> Vec<IndicatorAverage> {
    let mut present: Vec<IndicatorAverage> = catalog
        .iter()
        .filter_map(|&(code, label)| {
            averages.get(code).map(|average| IndicatorAverage {
                code,
                label,
                average: *average,
            })
        })
        .collect();

    present.sort_by(|left, right| {
        right
            .average
            .partial_cmp(&left.average)
            .unwrap_or(Ordering::Equal)
    });
    present.truncate(count);
    present
}

pub fn top_social_indicators(averages: &BTreeMap<String, f64>) -> Vec<IndicatorAverage> {
    top_indicators(averages, SOCIAL_INDICATORS, TOP_INDICATOR_COUNT)
}

pub fn top_environmental_indicators(averages: &BTreeMap<String, f64>) -> Vec<IndicatorAverage> {
    top_indicators(averages, ENVIRONMENTAL_INDICATORS, TOP_INDICATOR_COUNT)
}

fn max_average(indicators: &[IndicatorAverage]) -> Option<f64> {
    indicators
        .iter()
        .map(|indicator| indicator.average)
        .reduce(f64::max)
}

/// Demographic index and EJ score are the highest of the leading social and
/// environmental percentiles. A group with no data leaves its field unset.
pub fn ej_indexes(averages: &BTreeMap<String, f64>) -> LocationContext {
    LocationContext {
        demographic_index: max_average(&top_social_indicators(averages)),
        environmental_justice_score: max_average(&top_environmental_indicators(averages)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn averages(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(code, value)| (code.to_string(), *value))
            .collect()
    }

    #[test]
    fn picks_three_largest_with_labels() {
        let averages = averages(&[
            ("P_PEOPCOLO", 30.0),
            ("P_LOWINCPC", 72.5),
            ("P_UNEMPPCT", 55.0),
            ("P_OVER64PC", 61.0),
            ("P_PM25", 90.0),
        ]);

        let social = top_social_indicators(&averages);
        let codes: Vec<&str> = social.iter().map(|indicator| indicator.code).collect();
        assert_eq!(codes, vec!["P_LOWINCPC", "P_OVER64PC", "P_UNEMPPCT"]);
        assert_eq!(social[0].label, "% Low Income");

        let environmental = top_environmental_indicators(&averages);
        assert_eq!(environmental.len(), 1);
        assert_eq!(environmental[0].label, "Particulate Matter 2.5");
    }

    #[test]
    fn ties_keep_catalog_order() {
        let averages = averages(&[("P_OZONE", 40.0), ("P_PM25", 40.0), ("P_UST", 40.0), ("P_NO2", 40.0)]);
        let codes: Vec<&str> = top_environmental_indicators(&averages)
            .iter()
            .map(|indicator| indicator.code)
            .collect();
        assert_eq!(codes, vec!["P_PM25", "P_OZONE", "P_UST"]);
    }

    #[test]
    fn indexes_use_group_maxima() {
        let context = ej_indexes(&averages(&[
            ("P_LIFEEXPP", 64.0),
            ("P_DISABILI", 12.0),
            ("P_DWATER", 33.0),
            ("P_PTRAF", 81.0),
        ]));
        assert_eq!(context.demographic_index, Some(64.0));
        assert_eq!(context.environmental_justice_score, Some(81.0));

        let empty = ej_indexes(&BTreeMap::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn catalog_covers_every_ejscreen_column() {
        let codes = all_indicator_codes();
        assert_eq!(codes.len(), 22);
        assert!(codes.contains(&"P_RSEI_AIR"));
    }
}
