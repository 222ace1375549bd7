use crate::model::{self, Fixture, Point};

use super::mode::FixtureEditMode;
use super::selection::Selection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Owns the fixture collection, the session edit mode and the transient
/// sidebar fields mirrored from the selected fixture.
#[derive(Clone, Debug)]
pub struct FixtureStore {
    fixtures: Vec<Fixture>,
    next_id: u64,
    mode: FixtureEditMode,
    position: Point,
    name: String,
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureStore {
    pub fn new() -> Self {
        Self {
            fixtures: Vec::new(),
            next_id: 1,
            mode: FixtureEditMode::Object,
            position: Point::ZERO,
            name: String::new(),
        }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.id == id)
    }

    pub(super) fn get_mut(&mut self, id: &str) -> Option<&mut Fixture> {
        self.fixtures.iter_mut().find(|f| f.id == id)
    }

    pub fn selected<'a>(&'a self, selection: &Selection) -> Option<&'a Fixture> {
        selection.fixture().and_then(|id| self.get(id))
    }

    pub fn mode(&self) -> FixtureEditMode {
        self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        self.mode == FixtureEditMode::Edit
    }

    /// World position mirrored for the sidebar inputs.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn allocate_id(&mut self) -> String {
        loop {
            let id = format!("f{}", self.next_id);
            self.next_id += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Creates the default 1m x 8m fixture. Does not select it.
    pub fn add_fixture(&mut self) -> String {
        self.add_fixture_with_points(model::DEFAULT_FIXTURE_POINTS.to_vec())
    }

    /// Creates a fixture from an arbitrary outline, re-centered so its
    /// centroid is the local origin.
    pub fn add_fixture_with_points(&mut self, mut points: Vec<f32>) -> String {
        let id = self.allocate_id();
        model::recenter(&mut points);
        let origin = model::DEFAULT_FIXTURE_ORIGIN;
        self.fixtures.push(Fixture {
            id: id.clone(),
            x: origin.x,
            y: origin.y,
            points,
            name: model::DEFAULT_FIXTURE_NAME.to_string(),
            color: Some(model::DEFAULT_FIXTURE_COLOR.to_string()),
        });
        log::debug!("Added fixture {id}");
        id
    }

    /// Unknown ids are ignored.
    pub fn select_fixture(&mut self, selection: &mut Selection, id: &str) -> bool {
        let Some((position, name)) = self.get(id).map(|f| (f.origin(), f.name.clone())) else {
            log::warn!("Ignoring selection of unknown fixture {id}");
            return false;
        };
        self.position = position;
        self.name = name;
        selection.select_fixture(id);
        true
    }

    pub fn deselect(&mut self, selection: &mut Selection) {
        selection.clear();
        self.position = Point::ZERO;
        self.name.clear();
    }

    pub fn delete_fixture(&mut self, selection: &mut Selection) -> Option<Fixture> {
        let id = selection.fixture()?.to_string();
        let removed = self
            .fixtures
            .iter()
            .position(|f| f.id == id)
            .map(|idx| self.fixtures.remove(idx));
        self.deselect(selection);
        if removed.is_some() {
            log::debug!("Deleted fixture {id}");
        }
        removed
    }

    pub fn rename(&mut self, selection: &Selection, new_name: &str) {
        let Some(fixture) = selection.fixture().and_then(|id| self.get_mut(id)) else {
            return;
        };
        fixture.name = new_name.to_string();
        self.name = new_name.to_string();
    }

    pub fn recolor(&mut self, selection: &Selection, new_color: &str) {
        if let Some(fixture) = selection.fixture().and_then(|id| self.get_mut(id)) {
            fixture.color = Some(new_color.to_string());
        }
    }

    /// Sets world `x` or `y` of the selected fixture. Non-finite values are ignored.
    pub fn reposition_by_axis(&mut self, selection: &Selection, axis: Axis, value: f32) {
        if !value.is_finite() {
            return;
        }
        let Some(fixture) = selection.fixture().and_then(|id| self.get_mut(id)) else {
            return;
        };
        match axis {
            Axis::X => fixture.x = value,
            Axis::Y => fixture.y = value,
        }
        match axis {
            Axis::X => self.position.x = value,
            Axis::Y => self.position.y = value,
        }
    }

    /// Moves a fixture so its origin sits under the canvas pixel position `screen`.
    pub fn reposition_by_drag(&mut self, selection: &Selection, id: &str, screen: Point) {
        let world = model::screen_to_world(screen);
        let Some(fixture) = self.get_mut(id) else {
            return;
        };
        fixture.x = world.x;
        fixture.y = world.y;
        if selection.is_fixture(id) {
            self.position = world;
        }
    }

    /// Edit mode requires a selected fixture; returning to object mode is always allowed.
    pub fn set_mode(&mut self, selection: &Selection, mode: FixtureEditMode) -> bool {
        if mode == FixtureEditMode::Edit && self.selected(selection).is_none() {
            log::debug!("Edit mode needs a selected fixture");
            return false;
        }
        if self.mode != mode {
            log::debug!("Fixture mode -> {mode}");
        }
        self.mode = mode;
        true
    }

    pub fn toggle_mode(&mut self, selection: &Selection) -> bool {
        self.set_mode(selection, self.mode.toggled())
    }

    /// Replaces the whole collection, e.g. after loading a saved layout.
    pub fn replace_all(&mut self, selection: &mut Selection, fixtures: Vec<Fixture>) {
        self.deselect(selection);
        self.fixtures = fixtures;
        self.mode = FixtureEditMode::Object;
        self.next_id = self
            .fixtures
            .iter()
            .filter_map(|f| f.id.strip_prefix('f').and_then(|n| n.parse::<u64>().ok()))
            .max()
            .map_or(1, |n| n + 1);
    }
}
