//! The condition/when-expression language (spec §4.4), ported function for
//! function from `pkg/policy/conditions.go`.

use chrono::Timelike;
use kernel::Clock;
use std::collections::HashMap;

/// spec §4.4-A. Empty map holds trivially.
pub fn evaluate_conditions(conditions: &HashMap<String, String>, env: &HashMap<String, String>, clock: &dyn Clock) -> bool {
    if conditions.is_empty() {
        return true;
    }
    conditions.iter().all(|(key, expected)| match key.as_str() {
        "time" => evaluate_time_condition(expected, env, clock),
        _ => env.get(key).is_some_and(|v| v == expected),
    })
}

/// The only recognised expected value for the `time` key is
/// `business-hours`, holding iff the hour derived from `env["time"]`
/// (`HH:MM`) — or the clock, if `time` is absent — falls in `[9, 17)`.
fn evaluate_time_condition(expected: &str, env: &HashMap<String, String>, clock: &dyn Clock) -> bool {
    if expected != "business-hours" {
        return false;
    }
    let hour = match env.get("time").and_then(|t| parse_hour(t)) {
        Some(h) => h,
        None => clock.now().hour(),
    };
    (9..17).contains(&hour)
}

/// Parses `HH:MM` into an hour-of-day. Malformed input is treated as absent,
/// matching the original's silent fallback to `time.Parse` failure.
fn parse_hour(value: &str) -> Option<u32> {
    let (hh, mm) = value.split_once(':')?;
    let hour: u32 = hh.parse().ok()?;
    let _minute: u32 = mm.parse().ok()?;
    if hour > 23 { None } else { Some(hour) }
}

/// spec §4.4-B. Empty list holds trivially; all predicates must hold.
pub fn evaluate_when(exprs: &[String], env: &HashMap<String, String>) -> bool {
    exprs.iter().all(|expr| evaluate_expression(expr, env))
}

/// Parses and evaluates one `context.<key> <op> <literal>` predicate.
fn evaluate_expression(expr: &str, env: &HashMap<String, String>) -> bool {
    let expr = expr.trim();
    let (op, left, right) = if let Some((l, r)) = expr.split_once("==") {
        ("==", l, r)
    } else if let Some((l, r)) = expr.split_once('>') {
        (">", l, r)
    } else if let Some((l, r)) = expr.split_once('<') {
        ("<", l, r)
    } else {
        return false;
    };

    let left = left.trim();
    let right = right.trim().trim_matches(|c| c == '\'' || c == '"');

    let Some(key) = left.strip_prefix("context.") else {
        return false;
    };
    let Some(val) = env.get(key) else {
        return false;
    };

    match op {
        "==" => val == right,
        "<" | ">" => compare_values(val, right, op),
        _ => false,
    }
}

/// The fallback ladder: numeric comparison, then the fixed risk ordinal
/// (`low(1) < medium(2) < high(3)`, case-insensitive), then lexical
/// comparison. Centralized here per spec §9; not reused elsewhere.
fn compare_values(left: &str, right: &str, op: &str) -> bool {
    if let (Ok(lf), Ok(rf)) = (left.parse::<f64>(), right.parse::<f64>()) {
        return match op {
            "<" => lf < rf,
            ">" => lf > rf,
            _ => false,
        };
    }

    fn ordinal(s: &str) -> Option<u8> {
        match s.to_lowercase().as_str() {
            "low" => Some(1),
            "medium" => Some(2),
            "high" => Some(3),
            _ => None,
        }
    }
    if let (Some(lv), Some(rv)) = (ordinal(left), ordinal(right)) {
        return match op {
            "<" => lv < rv,
            ">" => lv > rv,
            _ => false,
        };
    }

    match op {
        "<" => left < right,
        ">" => left > right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kernel::FixedClock;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn noon_clock() -> FixedClock {
        FixedClock(chrono::Utc.with_ymd_and_hms(2026, 7, 26, 12, 0, 0).unwrap())
    }

    #[test]
    fn empty_conditions_hold() {
        assert!(evaluate_conditions(&HashMap::new(), &HashMap::new(), &noon_clock()));
    }

    #[test]
    fn business_hours_condition_within_window() {
        let conds: HashMap<String, String> =
            [("time".to_string(), "business-hours".to_string())].into();
        assert!(evaluate_conditions(&conds, &env(&[("time", "10:00")]), &noon_clock()));
    }

    #[test]
    fn business_hours_condition_outside_window() {
        let conds: HashMap<String, String> =
            [("time".to_string(), "business-hours".to_string())].into();
        assert!(!evaluate_conditions(&conds, &env(&[("time", "20:00")]), &noon_clock()));
    }

    #[test]
    fn business_hours_falls_back_to_clock_when_env_omits_time() {
        let conds: HashMap<String, String> =
            [("time".to_string(), "business-hours".to_string())].into();
        assert!(evaluate_conditions(&conds, &HashMap::new(), &noon_clock()));
    }

    #[test]
    fn arbitrary_key_requires_exact_match() {
        let conds: HashMap<String, String> = [("region".to_string(), "eu".to_string())].into();
        assert!(evaluate_conditions(&conds, &env(&[("region", "eu")]), &noon_clock()));
        assert!(!evaluate_conditions(&conds, &env(&[("region", "us")]), &noon_clock()));
        assert!(!evaluate_conditions(&conds, &HashMap::new(), &noon_clock()));
    }

    #[test]
    fn empty_when_holds() {
        assert!(evaluate_when(&[], &HashMap::new()));
    }

    #[test]
    fn when_equality() {
        let e = env(&[("time", "business-hours")]);
        assert!(evaluate_when(&["context.time == \"business-hours\"".to_string()], &e));
        assert!(!evaluate_when(&["context.time == \"after-hours\"".to_string()], &e));
    }

    #[test]
    fn when_numeric_comparison() {
        let e = env(&[("count", "5")]);
        assert!(evaluate_when(&["context.count < '10'".to_string()], &e));
        assert!(!evaluate_when(&["context.count > '10'".to_string()], &e));
    }

    #[test]
    fn when_ordinal_comparison_case_insensitive() {
        let e = env(&[("risk", "Low")]);
        assert!(evaluate_when(&["context.risk < \"medium\"".to_string()], &e));
        assert!(evaluate_when(&["context.risk < \"HIGH\"".to_string()], &e));
    }

    #[test]
    fn when_lexical_fallback() {
        let e = env(&[("tier", "bronze")]);
        assert!(evaluate_when(&["context.tier < 'silver'".to_string()], &e));
    }

    #[test]
    fn when_missing_key_is_false() {
        assert!(!evaluate_when(&["context.missing == \"x\"".to_string()], &HashMap::new()));
    }
}
