//! Navigation menu and my-page tabs.
use thiserror::Error;
use url::Url;

use crate::session::CurrentUser;

/// Path of the notifications screen; its badge reads zero while it is open.
pub const NOTIFICATIONS_PATH: &str = "/noti";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Home,
    Search,
    Notifications,
    Write,
    Chat,
    MyPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub link: &'static str,
    pub target: MenuTarget,
    /// Unread badge, only on the notifications entry.
    pub badge: Option<usize>,
}

impl MenuItem {
    const fn new(label: &'static str, link: &'static str, target: MenuTarget) -> Self {
        Self {
            label,
            link,
            target,
            badge: None,
        }
    }
}

/// Menu entries for the side navigation.
///
/// Everyone gets Home and Search; logged-in users also get Notifications,
/// Write, Chat and My page.
pub fn menu_items(logged_in: bool, unread: usize, current_path: &str) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::new("Home", "/", MenuTarget::Home),
        MenuItem::new("Search", "/search", MenuTarget::Search),
    ];

    if logged_in {
        let badge = if current_path == NOTIFICATIONS_PATH {
            0
        } else {
            unread
        };
        items.push(MenuItem {
            badge: Some(badge),
            ..MenuItem::new("Notifications", NOTIFICATIONS_PATH, MenuTarget::Notifications)
        });
        items.push(MenuItem::new("Write", "/write", MenuTarget::Write));
        items.push(MenuItem::new("Chat", "/room", MenuTarget::Chat));
        items.push(MenuItem::new("My page", "/mypage", MenuTarget::MyPage));
    }

    items
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyPageTab {
    pub label: &'static str,
    pub path: String,
}

/// Tabs on the my-page screen for `user_id`. Influencers also manage
/// memberships and their own feeds.
pub fn mypage_tabs(user_id: &str, user: Option<&CurrentUser>) -> Vec<MyPageTab> {
    let mut tabs = vec![
        MyPageTab {
            label: "Likes",
            path: format!("/mypage/{}/likes", user_id),
        },
        MyPageTab {
            label: "Follows",
            path: format!("/mypage/{}/follows", user_id),
        },
    ];

    if user.is_some_and(CurrentUser::is_influencer) {
        tabs.push(MyPageTab {
            label: "Membership",
            path: format!("/mypage/{}/membership/manage", user_id),
        });
        tabs.push(MyPageTab {
            label: "My feeds",
            path: format!("/mypage/{}/feeds", user_id),
        });
    }

    tabs
}

/// Which tab path should be active: the current path when it is one of the
/// tabs, else the likes tab. `None` when nobody is logged in.
pub fn resolve_mypage_path(
    user_id: Option<&str>,
    tabs: &[MyPageTab],
    current_path: &str,
) -> Option<String> {
    let user_id = user_id?;
    if tabs.iter().any(|t| t.path == current_path) {
        return Some(current_path.to_string());
    }
    Some(format!("/mypage/{}/likes", user_id))
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Join `path` onto the web app base URL, refusing anything but http(s).
pub fn web_link(web_base_url: &str, path: &str) -> Result<Url, LinkError> {
    let url = Url::parse(web_base_url)?.join(path)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InfluencerProfile;
    use pretty_assertions::assert_eq;

    fn labels(items: &[MenuItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.label).collect()
    }

    #[test]
    fn test_logged_out_menu() {
        assert_eq!(labels(&menu_items(false, 5, "/")), vec!["Home", "Search"]);
    }

    #[test]
    fn test_logged_in_menu_with_badge() {
        let items = menu_items(true, 3, "/");
        assert_eq!(
            labels(&items),
            vec!["Home", "Search", "Notifications", "Write", "Chat", "My page"]
        );
        assert_eq!(items[2].badge, Some(3));
    }

    #[test]
    fn test_badge_hidden_on_notifications_screen() {
        let items = menu_items(true, 3, NOTIFICATIONS_PATH);
        assert_eq!(items[2].badge, Some(0));
    }

    #[test]
    fn test_influencer_gets_extra_tabs() {
        let mut user = CurrentUser::new("u1");
        assert_eq!(mypage_tabs("u1", Some(&user)).len(), 2);

        user.influencer = Some(InfluencerProfile {
            id: Some(7),
            banner_picture: Some("banner.png".into()),
        });
        let tabs = mypage_tabs("u1", Some(&user));
        assert_eq!(tabs.len(), 4);
        assert_eq!(tabs[2].path, "/mypage/u1/membership/manage");
        assert_eq!(tabs[3].path, "/mypage/u1/feeds");
    }

    #[test]
    fn test_resolve_mypage_path() {
        let tabs = mypage_tabs("u1", None);
        assert_eq!(
            resolve_mypage_path(Some("u1"), &tabs, "/mypage/u1/follows").as_deref(),
            Some("/mypage/u1/follows")
        );
        assert_eq!(
            resolve_mypage_path(Some("u1"), &tabs, "/mypage/u1/feeds").as_deref(),
            Some("/mypage/u1/likes")
        );
        assert_eq!(resolve_mypage_path(None, &tabs, "/mypage/u1/likes"), None);
    }

    #[test]
    fn test_web_link() {
        assert_eq!(
            web_link("http://localhost:3000", "/mypage/u1/likes")
                .unwrap()
                .as_str(),
            "http://localhost:3000/mypage/u1/likes"
        );
        assert!(matches!(
            web_link("file:///etc", "passwd"),
            Err(LinkError::UnsupportedScheme(_))
        ));
    }
}
