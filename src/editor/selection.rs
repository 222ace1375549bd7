/// The one active selection shared by the fixture, edge and vertex views.
///
/// Stores never keep their own copy; callers pass this value into each
/// operation. Edge and vertex selection are mutually exclusive and both are
/// scoped to the selected fixture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    fixture: Option<String>,
    edge: Option<usize>,
    vertex: Option<usize>,
}

impl Selection {
    pub fn fixture(&self) -> Option<&str> {
        self.fixture.as_deref()
    }

    pub fn edge(&self) -> Option<usize> {
        self.edge
    }

    pub fn vertex(&self) -> Option<usize> {
        self.vertex
    }

    pub fn is_fixture(&self, id: &str) -> bool {
        self.fixture.as_deref() == Some(id)
    }

    /// Selects a fixture and drops any edge or vertex of the previous one.
    pub fn select_fixture(&mut self, id: impl Into<String>) {
        self.fixture = Some(id.into());
        self.edge = None;
        self.vertex = None;
    }

    pub fn select_edge(&mut self, index: usize) {
        self.edge = Some(index);
        self.vertex = None;
    }

    pub fn select_vertex(&mut self, index: usize) {
        self.vertex = Some(index);
        self.edge = None;
    }

    pub fn clear_edge(&mut self) {
        self.edge = None;
    }

    pub fn clear_vertex(&mut self) {
        self.vertex = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
