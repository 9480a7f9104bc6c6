use serde::Serialize;

/// A navigation target of the marketing site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub path: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
}

pub const PAGES: [Page; 9] = [
    Page {
        path: "/",
        title: "Home",
        summary: "Local moving, junk removal and hauling with flat-rate pricing.",
    },
    Page {
        path: "/about",
        title: "About",
        summary: "Who we are and how we work.",
    },
    Page {
        path: "/services",
        title: "Services",
        summary: "Moving, junk removal, furniture delivery and custom hauling.",
    },
    Page {
        path: "/pricing",
        title: "Pricing",
        summary: "Transparent flat rates, no hidden fees.",
    },
    Page {
        path: "/offers",
        title: "Special Offers",
        summary: "Current discounts and seasonal deals.",
    },
    Page {
        path: "/reviews",
        title: "Reviews",
        summary: "What our customers say.",
    },
    Page {
        path: "/contact",
        title: "Contact",
        summary: "Phone, email and service area.",
    },
    Page {
        path: "/estimate",
        title: "Get Your Free Estimate",
        summary: "Tell us about your job and get a flat-rate quote within 2 hours.",
    },
    Page {
        path: "/student",
        title: "Student Promo",
        summary: "Discounted moves for students.",
    },
];

/// Look up a page by path; trailing slashes are ignored.
pub fn find_page(path: &str) -> Option<&'static Page> {
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };
    PAGES.iter().find(|page| page.path == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_page() {
        assert_eq!(find_page("/").unwrap().title, "Home");
        assert_eq!(find_page("/student/").unwrap().title, "Student Promo");
        assert!(find_page("/careers").is_none());
    }
}
