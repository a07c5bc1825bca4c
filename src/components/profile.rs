//! Static profile sections rendered over the starfield.
//!
//! All content comes from [`ProfileContent`], a plain data table. The
//! components below only lay it out.

use leptos::prelude::*;
use serde::Deserialize;

/// Banner at the top of the page.
#[derive(Clone, Debug, Deserialize)]
pub struct Hero {
	pub title: String,
	pub tagline: String,
	/// Avatar image URL.
	pub avatar: String,
}

/// One entry in the social links row.
#[derive(Clone, Debug, Deserialize)]
pub struct SocialLink {
	/// Icon name, rendered as an `icon-<name>` class.
	pub icon: String,
	pub label: String,
	pub href: String,
}

impl SocialLink {
	/// Links leaving the page open in a new tab.
	pub fn is_external(&self) -> bool {
		self.href.starts_with("http")
	}

	pub fn target(&self) -> Option<&'static str> {
		self.is_external().then_some("_blank")
	}

	/// New-tab links get no opener and no referrer.
	pub fn rel(&self) -> Option<&'static str> {
		self.is_external().then_some("noopener noreferrer")
	}
}

/// One card in the skills grid.
#[derive(Clone, Debug, Deserialize)]
pub struct SkillCard {
	pub icon: String,
	pub name: String,
	/// Decorative background image URL.
	pub image: String,
}

/// Everything shown on the page apart from the starfield.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProfileContent {
	pub hero: Hero,
	pub links: Vec<SocialLink>,
	pub skills_title: String,
	pub skills: Vec<SkillCard>,
}

const UNSPLASH: &str = "https://images.unsplash.com";

fn link(icon: &str, label: &str, href: &str) -> SocialLink {
	SocialLink {
		icon: icon.into(),
		label: label.into(),
		href: href.into(),
	}
}

fn skill(icon: &str, name: &str, photo: &str) -> SkillCard {
	SkillCard {
		icon: icon.into(),
		name: name.into(),
		image: format!("{UNSPLASH}/{photo}?auto=format&fit=crop&q=80&w=400"),
	}
}

impl Default for ProfileContent {
	fn default() -> Self {
		Self {
			hero: Hero {
				title: "CYBERPUNK".into(),
				tagline: "Decoding Reality, Encoding Revolution".into(),
				avatar: format!(
					"{UNSPLASH}/photo-1701195618122-5c1d1c0c9d1c?auto=format&fit=crop&q=80&w=600&h=600"
				),
			},
			links: vec![
				link("mail", "Mail", "#"),
				link("github", "GitHub", "#"),
				link("twitter", "Twitter", "#"),
				link("send", "Telegram", "https://t.me/cyberpunk_about"),
			],
			skills_title: "SKILLS MATRIX".into(),
			skills: vec![
				skill("shield-alert", "Penetration Testing", "photo-1526374965328-7f61d4dc18c5"),
				skill("network", "Network Analysis", "photo-1558494949-ef010cbdcc31"),
				skill("code-2", "Analyst", "photo-1550751827-4bd374c3f58b"),
				skill("bug", "Reverse Engineering", "photo-1544197150-b99a580bb7a8"),
				skill("siren", "Incident Response", "photo-1563013544-824ae1b704d3"),
				skill("terminal-square", "Kali Linux", "photo-1629654297299-c8506221ca97"),
				skill("radar", "Threat Hunting", "photo-1563089145-599997674d42"),
				skill("microscope", "Malware Analysis", "photo-1548092372-0d1bd40894a3"),
				skill("terminal", "Shell Scripting", "photo-1526925539332-aa3b66e35444"),
				skill("lock", "Cryptography", "photo-1526374870839-e155464bb9b2"),
				skill("code-2", "Programmer", "photo-1555066931-4365d14bab8c"),
				skill("globe", "Web Security", "photo-1556742049-0cfed4f6a45d"),
				skill("search", "Forensics", "photo-1556742111-a301076d9d18"),
				skill("flag", "CTF Player", "photo-1550751827-4bd374c3f58b"),
				skill("boxes", "Secure Design", "photo-1558494949-ef010cbdcc31"),
			],
		}
	}
}

#[component]
fn Icon(name: String) -> impl IntoView {
	view! { <span class=format!("icon icon-{}", name) /> }
}

/// Avatar, title, tagline and the social links row.
#[component]
pub fn HeroSection(hero: Hero, links: Vec<SocialLink>) -> impl IntoView {
	let links = links
		.into_iter()
		.map(|l| {
			let (target, rel) = (l.target(), l.rel());
			view! {
				<a href=l.href title=l.label target=target rel=rel class="social-link">
					<Icon name=l.icon />
				</a>
			}
		})
		.collect_view();

	view! {
		<section class="hero">
			<img src=hero.avatar alt="Profile" class="avatar" />
			<h1 class="gradient-text">{hero.title}</h1>
			<p class="tagline">{hero.tagline}</p>
			<div class="social-links">{links}</div>
		</section>
	}
}

/// Grid of skill cards. Card animations are staggered by index.
#[component]
pub fn SkillGrid(title: String, skills: Vec<SkillCard>) -> impl IntoView {
	let cards = skills
		.into_iter()
		.enumerate()
		.map(|(i, s)| {
			let delay = format!("animation-delay: {:.1}s", i as f64 * 0.1);
			view! {
				<div class="skill-card" style=delay>
					<img src=s.image alt=s.name.clone() class="skill-image" />
					<div class="skill-body">
						<Icon name=s.icon />
						<h3>{s.name}</h3>
						<span class="skill-status">"ACTIVE"</span>
					</div>
				</div>
			}
		})
		.collect_view();

	view! {
		<section class="skills">
			<h2 class="gradient-text">{title}</h2>
			<div class="skill-grid">{cards}</div>
		</section>
	}
}
