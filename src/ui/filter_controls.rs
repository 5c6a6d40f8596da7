use crate::state::chart_state::ChartState;
use crate::state::events::{ChartEvent, FilterChange};
use crate::state::filter_state::{DistanceBand, Outcome};

/// Draw the filter row above the scatter. Changes are returned as events
/// rather than applied here so that the chart handles them one by one.
pub fn show_filter_controls(ui: &mut egui::Ui, chart: &ChartState) -> Vec<ChartEvent> {
    let mut events = Vec::new();
    let filters = chart.filters();

    ui.horizontal_wrapped(|ui| {
        ui.label("Result:");
        let mut outcome = filters.outcome();
        for option in Outcome::ALL {
            ui.selectable_value(&mut outcome, option, option.label());
        }
        if outcome != filters.outcome() {
            events.push(ChartEvent::Filter(FilterChange::Outcome(outcome)));
        }

        ui.separator();

        ui.label("Distance:");
        let mut band = filters.band();
        egui::ComboBox::from_id_salt(("band", chart.title()))
            .selected_text(band.label())
            .width(140.0)
            .show_ui(ui, |ui| {
                for option in DistanceBand::ALL {
                    ui.selectable_value(&mut band, option, option.label());
                }
            });
        if band != filters.band() {
            events.push(ChartEvent::Filter(FilterChange::Band(band)));
        }

        ui.separator();

        name_picker(
            ui,
            ("players", chart.title()),
            "Players",
            chart.actors(),
            |name| filters.selected_actors().contains(name),
            |name, selected| FilterChange::Actor { name, selected },
            FilterChange::AllActors,
            &mut events,
        );
        name_picker(
            ui,
            ("teams", chart.title()),
            "Teams",
            chart.groups(),
            |name| filters.selected_groups().contains(name),
            |name, selected| FilterChange::Group { name, selected },
            FilterChange::AllGroups,
            &mut events,
        );
    });

    events
}

/// Drop-down with All / None buttons and one checkbox per name.
#[allow(clippy::too_many_arguments)]
fn name_picker(
    ui: &mut egui::Ui,
    id_salt: impl std::hash::Hash,
    label: &str,
    names: &[String],
    is_selected: impl Fn(&str) -> bool,
    toggle: impl Fn(String, bool) -> FilterChange,
    all: impl Fn(bool) -> FilterChange,
    events: &mut Vec<ChartEvent>,
) {
    let selected_count = names.iter().filter(|n| is_selected(n.as_str())).count();
    let summary = if selected_count == names.len() {
        format!("{label}: all")
    } else {
        format!("{label}: {selected_count}/{}", names.len())
    };

    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(summary)
        .width(160.0)
        .height(320.0)
        .show_ui(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.small_button("All").clicked() {
                    events.push(ChartEvent::Filter(all(true)));
                }
                if ui.small_button("None").clicked() {
                    events.push(ChartEvent::Filter(all(false)));
                }
            });
            ui.separator();
            for name in names {
                let mut checked = is_selected(name.as_str());
                if ui.checkbox(&mut checked, name.as_str()).changed() {
                    events.push(ChartEvent::Filter(toggle(name.clone(), checked)));
                }
            }
        });
}
