//! Project catalog, category filtering, and the show-more cap.

/// Project category, used both as card metadata and as a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Web,
    Ai,
    Security,
    Systems,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Web => "Web",
            Category::Ai => "AI/ML",
            Category::Security => "Security",
            Category::Systems => "Systems",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Category(Category),
}

impl Filter {
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Category(category) => category.label(),
        }
    }

    /// Cycle through the available filters in display order.
    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Category(Category::Web),
            Filter::Category(Category::Web) => Filter::Category(Category::Ai),
            Filter::Category(Category::Ai) => Filter::Category(Category::Security),
            Filter::Category(Category::Security) => Filter::Category(Category::Systems),
            Filter::Category(Category::Systems) => Filter::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
    pub description: &'static str,
    pub categories: &'static [Category],
    /// Hidden behind "show more" until requested.
    pub extra: bool,
}

impl Project {
    pub fn matches(&self, filter: Filter) -> bool {
        match filter {
            Filter::All => true,
            Filter::Category(category) => self.categories.contains(&category),
        }
    }
}

/// Filter and show-more state over the catalog.
#[derive(Debug, Default)]
pub struct ProjectBoard {
    pub filter: Filter,
    pub show_all: bool,
    pub selected: usize,
}

impl ProjectBoard {
    /// Cards currently on screen: primary cards matching the filter, plus
    /// extras only once "show more" was requested.
    pub fn visible<'a>(&self, catalog: &'a [Project]) -> Vec<&'a Project> {
        catalog
            .iter()
            .filter(|project| project.matches(self.filter))
            .filter(|project| self.show_all || !project.extra)
            .collect()
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.selected = 0;
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        self.selected = 0;
    }

    pub fn select_next(&mut self, catalog: &[Project]) {
        let count = self.visible(catalog).len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self, catalog: &[Project]) {
        let count = self.visible(catalog).len();
        if count > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
        }
    }

    pub fn selected_project<'a>(&self, catalog: &'a [Project]) -> Option<&'a Project> {
        self.visible(catalog).get(self.selected).copied()
    }
}

/// The static portfolio catalog.
pub fn catalog() -> &'static [Project] {
    use Category::*;
    const CATALOG: &[Project] = &[
        Project {
            id: "project-portfolio",
            title: "Portfolio Site",
            blurb: "This site: a terminal portfolio client",
            description: "Single-page portfolio behavior rebuilt as a terminal app: \
                          theme persistence, dialog focus trapping, and an offline-tolerant \
                          contact form.",
            categories: &[Web, Systems],
            extra: false,
        },
        Project {
            id: "project-intrusion",
            title: "Intrusion Log Triage",
            blurb: "Clustering noisy IDS alerts",
            description: "Pipeline that clusters intrusion-detection alerts to cut analyst \
                          noise, with per-cluster severity scoring.",
            categories: &[Security, Ai],
            extra: false,
        },
        Project {
            id: "project-raytracer",
            title: "Parallel Ray Tracer",
            blurb: "Path tracing across all cores",
            description: "A physically based path tracer parallelized with a work-stealing \
                          scheduler; renders scenes in a few seconds per frame.",
            categories: &[Systems],
            extra: false,
        },
        Project {
            id: "project-classifier",
            title: "Sentiment Classifier",
            blurb: "Fine-tuned text classification",
            description: "Fine-tuned a small transformer for product-review sentiment, served \
                          behind a lightweight inference API.",
            categories: &[Ai],
            extra: false,
        },
        Project {
            id: "project-shop",
            title: "Campus Shop",
            blurb: "Full-stack storefront",
            description: "Storefront with cart, checkout, and an admin dashboard for a campus \
                          print shop.",
            categories: &[Web],
            extra: false,
        },
        Project {
            id: "project-passwords",
            title: "Password Audit Kit",
            blurb: "Credential hygiene tooling",
            description: "Toolkit for auditing leaked-credential exposure across an \
                          organization, with safe reporting output.",
            categories: &[Security],
            extra: false,
        },
        Project {
            id: "project-chat",
            title: "LAN Chat",
            blurb: "Peer-to-peer chat over UDP",
            description: "Server-less chat for local networks with peer discovery and message \
                          ordering.",
            categories: &[Systems, Web],
            extra: true,
        },
        Project {
            id: "project-scraper",
            title: "Research Scraper",
            blurb: "Citation graph collection",
            description: "Crawler that assembles citation graphs for literature reviews, with \
                          polite rate limiting.",
            categories: &[Ai, Web],
            extra: true,
        },
    ];
    CATALOG
}
