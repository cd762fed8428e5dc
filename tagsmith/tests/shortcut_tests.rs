//! End-to-end tests for the shortcut layer: forms, labels, named calls.

use facet_testhelpers::test;
use tagsmith::{FormSettings, Markup, MarkupError, SelectOption, Shortcut, UrlGenerator, prepare_options};

struct Router;

impl UrlGenerator for Router {
    fn action(&self, action: &str, _parameters: &[(&str, &str)]) -> String {
        format!("/do/{}", action.replace('@', "/"))
    }

    fn route(&self, route: &str, parameters: &[(&str, &str)]) -> String {
        let mut url = format!("/{}", route.replace('.', "/"));
        for (_, value) in parameters {
            url.push('/');
            url.push_str(value);
        }
        url
    }

    fn url(&self, path: &str, _parameters: &[(&str, &str)], _secure: Option<bool>) -> String {
        format!("https://site.test/{path}")
    }
}

#[test]
fn test_signup_form() {
    let mut form = Markup::add_form(&FormSettings::default());
    form.root_mut()
        .method("POST")
        .add_action(Router.route("users.store", &[]))
        .autocomplete("off")
        .input()
        .type_("email")
        .set_id("email")
        .name("email")
        .placeholder("you@example.com")
        .required(true)
        .autofocus()
        .parent()
        .unwrap()
        .select()
        .name("plan")
        .add_options(prepare_options([("free", "Free"), ("pro", "Pro")], true, ""), &["pro"]);

    assert_eq!(
        form.to_html(),
        concat!(
            r#"<form method="POST" action="/users/store" autocomplete="off">"#,
            r#"<input type="email" id="email" name="email" placeholder="you@example.com" "#,
            r#"class="required" aria-required="true" required="required" autofocus="autofocus"/>"#,
            r#"<select name="plan"><option value=""></option>"#,
            r#"<option value="free">Free</option>"#,
            r#"<option value="pro" selected="selected">Pro</option></select>"#,
            r#"</form>"#
        )
    );
}

#[test]
fn test_label_for_control() {
    let mut checkbox = Markup::input();
    checkbox.root_mut().type_("checkbox").set_id("terms").checked(true);
    let label = checkbox.root().label(" I agree");
    assert_eq!(
        label.to_html(),
        r#"<label for="terms"><input value="1" type="checkbox" id="terms" checked="checked"/> I agree</label>"#
    );
}

#[test]
fn test_route_link_with_extra_and_shortcuts() {
    let link = Markup::route_link(
        &Router,
        "Profile",
        "users.show",
        &[("user", "42")],
        &[("addClass", &["nav-link"]), ("title", &["Your profile"])],
        "#top",
    );
    assert_eq!(
        link.to_html(),
        r##"<a href="/users/show/42#top" class="nav-link" title="Your profile">Profile</a>"##
    );
}

#[test]
fn test_named_calls_match_typed_calls() {
    let mut typed = Markup::div();
    typed
        .root_mut()
        .add_class("box")
        .data("role", "panel")
        .style("color:red;", false)
        .hidden();

    let mut named = Markup::div();
    let calls: &[(&str, &[&str])] = &[
        ("addClass", &["box"]),
        ("data", &["role", "panel"]),
        ("style", &["color:red;"]),
        ("hidden", &[]),
    ];
    for &(name, args) in calls {
        named.root_mut().call(name, args).unwrap();
    }

    assert_eq!(named.to_html(), typed.to_html());
}

#[test]
fn test_named_add_icon_returns_child() {
    let mut button = Markup::button();
    button
        .root_mut()
        .call("addIcon", &["-fab fa-github"])
        .and_then(|icon| icon.call("title", &["GitHub"]))
        .unwrap();
    assert_eq!(
        button.to_html(),
        r#"<button><i class="fa fab fa-github" aria-hidden="true" title="GitHub"></i></button>"#
    );
}

#[test]
fn test_shortcut_table_is_consistent() {
    for shortcut in Shortcut::ALL {
        let snake: String = shortcut
            .name()
            .chars()
            .flat_map(|c| {
                if c.is_ascii_uppercase() {
                    vec!['_', c.to_ascii_lowercase()]
                } else {
                    vec![c]
                }
            })
            .collect();
        assert_eq!(Shortcut::from_name(&snake), Some(*shortcut), "{snake}");
    }
}

#[test]
fn test_errors_display_their_context() {
    let mut markup = Markup::div();
    let err = markup.root_mut().call("aria", &["label"]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("aria expects at least 2"), "{message}");

    let err: MarkupError = "bogus".parse::<tagsmith::OutputConvention>().unwrap_err();
    assert!(err.to_string().contains("bogus"));
}

#[test]
fn test_select_option_json() {
    let option: SelectOption = facet_json::from_str(r#"{"value": "x", "label": "X", "disabled": true}"#).unwrap();
    assert_eq!(option, SelectOption::new("x", "X").with_disabled(true));
}
