//! Starter element sets applied when a screen is created

use std::str::FromStr;

use crate::aggregate::PrototypeAggregate;
use crate::kind::ElementKind;

/// Canned screen layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTemplate {
    /// Full-screen black fill, centered status label, progress bar outline
    Loading,
    /// Header bar, plus a `SubMenu` screen to navigate to
    Menu,
}

impl FromStr for ScreenTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loading" => Ok(Self::Loading),
            "menu" => Ok(Self::Menu),
            other => Err(format!("unknown template '{}'", other)),
        }
    }
}

impl ScreenTemplate {
    /// Populate `screen_id`. Unknown screens are left alone.
    pub fn apply(self, aggregate: &mut PrototypeAggregate, screen_id: &str) {
        match self {
            Self::Loading => {
                add_styled(aggregate, screen_id, ElementKind::FillScreen, None, Some("#000000"));
                add_styled(aggregate, screen_id, ElementKind::DrawCentreString, Some("Loading..."), None);
                add_styled(aggregate, screen_id, ElementKind::DrawRect, Some("ProgressBarBorder"), None);
            }
            Self::Menu => {
                add_styled(aggregate, screen_id, ElementKind::FillRect, Some("HeaderBg"), None);
                aggregate.add_screen(Some("SubMenu"));
            }
        }
    }
}

fn add_styled(
    aggregate: &mut PrototypeAggregate,
    screen_id: &str,
    kind: ElementKind,
    name: Option<&str>,
    color: Option<&str>,
) {
    let Some(id) = aggregate.add_element(screen_id, kind, None).map(|el| el.id.clone()) else {
        return;
    };
    aggregate.edit_element(&id, |el| {
        if let Some(name) = name {
            el.name = name.to_string();
        }
        if let Some(color) = color {
            el.color = color.to_string();
        }
    });
}
