//! Which panels a log figure holds, and in which order.
use anyhow::Result;
use sactrace_core::logs::{count_quantities, LogFiles};

/// Content of a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    /// The running reward.
    RunningReward,

    /// Component `i` of the running multi-objective.
    MultiObjective(usize),

    /// Component `i` of the running loss.
    Loss(usize),

    /// The last actions.
    Actions,
}

/// A panel of a log figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    /// Content.
    pub kind: PanelKind,

    /// Label of the y axis.
    pub label: String,

    /// Whether values are drawn on a logarithmic scale.
    pub log_scale: bool,
}

impl Panel {
    fn new(kind: PanelKind, label: impl Into<String>, log_scale: bool) -> Self {
        Self {
            kind,
            label: label.into(),
            log_scale,
        }
    }

    /// Column of the panel's values in its log file.
    pub fn column(&self) -> usize {
        match self.kind {
            PanelKind::RunningReward | PanelKind::Actions => 1,
            PanelKind::MultiObjective(i) | PanelKind::Loss(i) => i + 1,
        }
    }
}

/// Label and scale of component `i` of the running loss.
pub fn loss_panel(i: usize, hybrid: bool) -> Panel {
    let kind = PanelKind::Loss(i);
    match i {
        0 => Panel::new(kind, "Q Running Loss", true),
        1 => Panel::new(kind, "Pi Running Loss", false),
        2 if hybrid => Panel::new(kind, "alpha_d", true),
        2 => Panel::new(kind, "alpha", true),
        3 if hybrid => Panel::new(kind, "alpha_c", true),
        3 => Panel::new(kind, "entropy", false),
        4 => Panel::new(kind, "entropy D", false),
        5 => Panel::new(kind, "entropy C", false),
        i => Panel::new(kind, format!("loss {}", i), false),
    }
}

/// Ordered panels of a log figure: running reward, multi-objective components, loss
/// components, actions. Panels of absent logs are left out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelLayout {
    panels: Vec<Panel>,
}

impl PanelLayout {
    /// Derives the layout from the logs that exist and their number of columns.
    pub fn from_files(files: &LogFiles, hybrid: bool) -> Result<Self> {
        let mut panels = vec![];
        if files.existing_running_reward().is_some() {
            panels.push(Panel::new(PanelKind::RunningReward, "G", false));
        }
        if let Some(path) = files.existing_running_multi_obj() {
            for i in 0..count_quantities(path)? {
                panels.push(Panel::new(
                    PanelKind::MultiObjective(i),
                    format!("Obj {}", i),
                    false,
                ));
            }
        }
        if let Some(path) = files.existing_running_loss() {
            for i in 0..count_quantities(path)? {
                panels.push(loss_panel(i, hybrid));
            }
        }
        if files.existing_actions().is_some() {
            panels.push(Panel::new(PanelKind::Actions, "u", false));
        }
        Ok(Self { panels })
    }

    /// The panels in drawing order.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Number of panels.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Returns `true` if no log exists.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sactrace_core::logs::LogSchema;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_panel_order_and_count() -> Result<()> {
        let dir = TempDir::new("layout")?;
        let schema = LogSchema::hybrid();
        let files = LogFiles::resolve(dir.path(), &schema);
        assert!(PanelLayout::from_files(&files, true)?.is_empty());

        fs::write(dir.path().join("actions.txt"), "0 1 0.5\n")?;
        fs::write(dir.path().join("running_reward.txt"), "0 0.5\n")?;
        fs::write(dir.path().join("running_loss.txt"), "0 1 2 3 4 5 6 7\n")?;
        fs::write(dir.path().join("running_multi_obj.txt"), "0 1 2\n")?;

        let layout = PanelLayout::from_files(&files, true)?;
        let kinds: Vec<PanelKind> = layout.panels().iter().map(|p| p.kind).collect();
        assert_eq!(layout.len(), 1 + 2 + 7 + 1);
        assert_eq!(kinds[0], PanelKind::RunningReward);
        assert_eq!(kinds[1], PanelKind::MultiObjective(0));
        assert_eq!(kinds[3], PanelKind::Loss(0));
        assert_eq!(kinds[10], PanelKind::Actions);

        let labels: Vec<&str> = layout.panels()[3..10].iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Q Running Loss",
                "Pi Running Loss",
                "alpha_d",
                "alpha_c",
                "entropy D",
                "entropy C",
                "loss 6"
            ]
        );

        let layout = PanelLayout::from_files(&files.running_loss(None), false)?;
        assert_eq!(layout.len(), 1 + 2 + 1);
        Ok(())
    }

    #[test]
    fn test_loss_panels_without_discrete_actions() {
        assert_eq!(loss_panel(2, false).label, "alpha");
        assert!(loss_panel(2, false).log_scale);
        assert_eq!(loss_panel(3, false).label, "entropy");
        assert!(!loss_panel(3, false).log_scale);
        assert!(loss_panel(3, true).log_scale);
        assert_eq!(loss_panel(3, false).column(), 4);
    }
}
