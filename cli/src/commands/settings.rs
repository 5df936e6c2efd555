use anyhow::Result;

use deficit_core::models::{BmrInputs, Sex, Theme};

use super::Tracker;
use super::helpers::parse_activity;

pub(crate) fn cmd_goal_set(tracker: &mut Tracker, value: f64, json: bool) -> Result<()> {
    let goal = tracker.set_goal(value)?;

    if json {
        println!("{}", serde_json::json!({ "goal": goal }));
    } else {
        println!("Daily goal saved: {goal} kcal");
    }
    Ok(())
}

pub(crate) fn cmd_goal_show(tracker: &Tracker, json: bool) -> Result<()> {
    let goal = tracker.goal();
    let explicit = tracker.settings().has_explicit_goal();

    if json {
        println!(
            "{}",
            serde_json::json!({ "goal": goal, "default": !explicit })
        );
    } else if explicit {
        println!("Daily goal: {goal} kcal");
    } else {
        println!("Daily goal: {goal} kcal (default)");
    }
    Ok(())
}

pub(crate) fn cmd_bmr_calc(
    tracker: &mut Tracker,
    age: u32,
    sex: &str,
    weight: f64,
    height: f64,
    activity: &str,
    json: bool,
) -> Result<()> {
    let sex: Sex = sex.parse()?;
    let activity = parse_activity(activity)?;
    let had_goal = tracker.settings().has_explicit_goal();

    let estimate = tracker.calculate_energy(BmrInputs {
        age,
        sex,
        weight,
        height,
        activity,
    })?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "bmr": estimate.bmr,
                "tdee": estimate.tdee,
                "goal": tracker.goal(),
            })
        );
    } else {
        println!("BMR:  {:.0} kcal/day", estimate.bmr);
        println!("TDEE: {:.0} kcal/day", estimate.tdee);
        if had_goal {
            println!("Daily goal unchanged: {} kcal", tracker.goal());
        } else {
            println!("Daily goal set to TDEE: {} kcal", tracker.goal());
        }
    }
    Ok(())
}

pub(crate) fn cmd_bmr_show(tracker: &Tracker, json: bool) -> Result<()> {
    let settings = tracker.settings();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "bmr": settings.bmr,
                "tdee": settings.tdee,
                "inputs": settings.bmr_inputs,
            }))?
        );
        return Ok(());
    }

    match (settings.bmr, settings.tdee) {
        (Some(bmr), Some(tdee)) => {
            println!("BMR:  {bmr:.0} kcal/day");
            println!("TDEE: {tdee:.0} kcal/day");
            if let Some(i) = &settings.bmr_inputs {
                println!(
                    "  from: age {}, {}, {} kg, {} cm, activity x{}",
                    i.age, i.sex, i.weight, i.height, i.activity
                );
            }
        }
        _ => eprintln!("No BMR calculated. Use `deficit bmr calc` to compute one."),
    }
    Ok(())
}

pub(crate) fn cmd_bmr_clear(tracker: &mut Tracker, json: bool) -> Result<()> {
    tracker.clear_bmr_result()?;

    if json {
        println!("{}", serde_json::json!({ "cleared": true }));
    } else {
        println!("BMR and TDEE cleared");
    }
    Ok(())
}

pub(crate) fn cmd_theme_show(tracker: &Tracker, json: bool) -> Result<()> {
    let theme = tracker.settings().theme;
    if json {
        println!("{}", serde_json::json!({ "theme": theme }));
    } else {
        println!("{theme}");
    }
    Ok(())
}

pub(crate) fn cmd_theme_set(tracker: &mut Tracker, theme: &str, json: bool) -> Result<()> {
    let theme: Theme = theme.parse()?;
    tracker.set_theme(theme)?;
    cmd_theme_show(tracker, json)
}

pub(crate) fn cmd_theme_toggle(tracker: &mut Tracker, json: bool) -> Result<()> {
    tracker.toggle_theme()?;
    cmd_theme_show(tracker, json)
}
