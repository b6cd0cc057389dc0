//! Plain-text page rendering.
//!
//! Everything renders into lines; `render_page` joins them. Labels use the
//! board's Japanese locale strings.

use bbs_core::config::DisplayConfig;
use bbs_core::format;
use bbs_core::models::{Thread, ThreadId, User, UserId};
use bbs_core::query;
use bbs_core::store::Store;
use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};

use crate::state::{AppState, Notice, Page, SearchState};

const SITE_TITLE: &str = "Laravel BBS";
const TITLE_WIDTH: usize = 48;
const QUOTE_WIDTH: usize = 60;

pub const THREAD_NOT_FOUND: &str = "スレッドが見つかりません";
pub const USER_NOT_FOUND: &str = "ユーザーが見つかりません";

/// Renders the current page with the header and any notice.
pub fn render_page(
    state: &AppState,
    store: &Store,
    display: &DisplayConfig,
    now: DateTime<Utc>,
) -> String {
    let mut lines = header(state, store);
    if let Some(notice) = &state.notice {
        lines.push(match notice {
            Notice::Info(text) => format!("✓ {text}"),
            Notice::Error(text) => format!("! {text}"),
        });
    }
    if state.is_loading() && state.search.in_flight.is_none() {
        lines.push("処理中...".to_string());
    }
    lines.push(String::new());

    let body = match &state.page {
        Page::Home => home(state, store, display, now),
        Page::Threads => {
            let mut out = vec!["スレッド一覧".to_string()];
            out.extend(thread_list(store, store.threads().iter(), now));
            out
        }
        Page::ThreadDetail { thread_id } => thread_detail(store, *thread_id, state.user),
        Page::CreateThread => create_thread(store),
        Page::Login => login(),
        Page::Register => register(),
        Page::Search => search(store, &state.search, now),
        Page::Profile { user_id } => match user_id.or(state.user) {
            Some(id) => profile(store, id, state.user, now),
            None => vec![USER_NOT_FOUND.to_string()],
        },
        Page::Category { slug } => category(store, slug, now),
    };
    lines.extend(body);
    lines.join("\n")
}

fn header(state: &AppState, store: &Store) -> Vec<String> {
    let who = state
        .user
        .and_then(|id| store.user(id))
        .map_or_else(|| "ゲスト".to_string(), |u| u.name.clone());
    vec![format!("{SITE_TITLE} | {who}"), "=".repeat(40)]
}

fn home(state: &AppState, store: &Store, display: &DisplayConfig, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        "Laravel 学習コミュニティ".to_string(),
        "Laravel開発者のための掲示板サイト。技術的な質問から開発日記まで、みんなで知識を共有しましょう。"
            .to_string(),
    ];
    if state.is_logged_in() {
        lines.push("[スレッドを作成] [スレッド一覧]".to_string());
    } else {
        lines.push("[今すぐ参加] [スレッドを見る]".to_string());
    }

    lines.push(String::new());
    lines.push("最新のスレッド".to_string());
    lines.extend(thread_list(
        store,
        store.recent_threads(display.home_thread_limit),
        now,
    ));

    lines.push(String::new());
    lines.extend(categories(store));
    lines.push(String::new());
    lines.extend(stats(store));
    lines.push(String::new());
    lines.extend(popular(store, display.popular_thread_limit));
    lines
}

/// Thread count per category.
pub fn categories(store: &Store) -> Vec<String> {
    let mut lines = vec!["カテゴリー".to_string()];
    for (category, count) in store.category_counts() {
        lines.push(format!("  {} ({})  {count}", category.name, category.slug));
    }
    lines
}

pub fn stats(store: &Store) -> Vec<String> {
    let stats = store.stats();
    vec![
        "統計情報".to_string(),
        format!("  総スレッド数    {}", format::count(stats.threads as u64)),
        format!("  総投稿数        {}", format::count(stats.posts as u64)),
        format!("  登録ユーザー数  {}", format::count(stats.users as u64)),
    ]
}

fn popular(store: &Store, limit: usize) -> Vec<String> {
    let mut lines = vec!["人気のスレッド".to_string()];
    for thread in store.popular_threads(limit) {
        lines.push(format!("  #{} {}", thread.id, thread.title));
        lines.push(format!(
            "     {} 閲覧 • {} 投稿",
            format::count(thread.view_count),
            thread.post_count
        ));
    }
    lines
}

/// Thread table, pinned threads first.
pub fn thread_list<'a>(
    store: &Store,
    threads: impl IntoIterator<Item = &'a Thread>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let threads = query::pinned_first(threads);
    if threads.is_empty() {
        return vec![
            THREAD_NOT_FOUND.to_string(),
            "条件を変更して再度検索してください".to_string(),
        ];
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Disabled);
    table.set_header(vec![
        "ID", "", "カテゴリー", "タイトル", "投稿者", "閲覧", "投稿", "作成", "最新",
    ]);
    for thread in threads {
        table.add_row(vec![
            thread.id.to_string(),
            markers(thread),
            store
                .category(thread.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            format::truncate(&thread.title, TITLE_WIDTH),
            author_name(store, thread.user_id),
            format::count(thread.view_count),
            thread.post_count.to_string(),
            format::relative_time(thread.created_at, now),
            thread
                .last_post
                .as_ref()
                .map(|p| format::relative_time(p.created_at, now))
                .unwrap_or_default(),
        ]);
    }
    table.to_string().lines().map(String::from).collect()
}

fn markers(thread: &Thread) -> String {
    let mut out = Vec::new();
    if thread.is_pinned {
        out.push("ピン留め");
    }
    if thread.is_locked {
        out.push("ロック済み");
    }
    out.join(" ")
}

fn author_name(store: &Store, user_id: UserId) -> String {
    store
        .user(user_id)
        .map_or_else(|| format!("#{user_id}"), |u| u.name.clone())
}

/// Thread with its posts. `viewer` controls the per-post actions shown.
pub fn thread_detail(store: &Store, thread_id: ThreadId, viewer: Option<UserId>) -> Vec<String> {
    let Some(thread) = store.thread(thread_id) else {
        return vec![THREAD_NOT_FOUND.to_string()];
    };

    let mut lines = vec!["← スレッド一覧に戻る".to_string(), String::new()];
    let mut badges = vec![
        store
            .category(thread.category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default(),
    ];
    let marks = markers(thread);
    if !marks.is_empty() {
        badges.push(marks);
    }
    lines.push(format!("[{}]", badges.join("] [")));
    lines.push(thread.title.clone());
    lines.push(String::new());
    lines.extend(thread.body.lines().map(String::from));
    for image in &thread.images {
        lines.push(format!("  画像: {} ({})", image.filename, image.path));
    }
    lines.push(String::new());
    lines.push(format!(
        "{}  閲覧 {}  投稿 {}  {}",
        author_name(store, thread.user_id),
        format::count(thread.view_count),
        thread.post_count,
        format::date_time(thread.created_at)
    ));

    for (index, post) in store.posts_for_thread(thread.id).into_iter().enumerate() {
        lines.push(String::new());
        lines.push("-".repeat(40));
        let mut meta = format!(
            "#{} {} - {}",
            index + 1,
            author_name(store, post.user_id),
            format::date_time(post.created_at)
        );
        if post.is_edited
            && let Some(edited_at) = post.edited_at
        {
            meta.push_str(&format!(" (編集済み: {})", format::date_time(edited_at)));
        }
        if let Some(viewer) = viewer {
            let mut actions = vec!["返信"];
            if viewer == post.user_id {
                actions.extend(["編集", "削除"]);
            }
            meta.push_str(&format!("  [{}] id={}", actions.join("/"), post.id));
        }
        lines.push(meta);
        if let Some(target) = &post.reply_to {
            lines.push(format!("  > {} への返信", author_name(store, target.user_id)));
            lines.push(format!("  > {}", format::preview(&target.content, QUOTE_WIDTH)));
        }
        lines.extend(post.content.lines().map(String::from));
    }

    if viewer.is_some() && !thread.is_locked {
        lines.push(String::new());
        lines.push("返信する: reply <本文> / reply-to <投稿ID> <本文>".to_string());
    }
    lines
}

fn create_thread(store: &Store) -> Vec<String> {
    let mut lines = vec!["新しいスレッドを作成".to_string(), String::new()];
    lines.push("カテゴリー".to_string());
    for category in store.categories() {
        lines.push(format!("  {} {}", category.id, category.name));
    }
    lines.push(String::new());
    lines.push("new <カテゴリーID> <タイトル> | <本文> [| <画像ファイル名>]...".to_string());
    lines.push(format!("画像 (最大{}枚)", bbs_core::models::MAX_THREAD_IMAGES));
    lines
}

fn login() -> Vec<String> {
    vec![
        "アカウントにログイン".to_string(),
        String::new(),
        "login <メールアドレス> <パスワード> [--remember]".to_string(),
        "または 新しいアカウントを作成: register".to_string(),
    ]
}

fn register() -> Vec<String> {
    vec![
        "新しいアカウントを作成".to_string(),
        String::new(),
        "register <名前> <メールアドレス> <パスワード> <パスワード確認>".to_string(),
    ]
}

fn search(store: &Store, search: &SearchState, now: DateTime<Utc>) -> Vec<String> {
    let category = search
        .category_id
        .map_or_else(
            || "すべて".to_string(),
            |id| store.category(id).map_or_else(|| format!("#{id}"), |c| c.name.clone()),
        );
    let mut lines = vec![
        "スレッド検索".to_string(),
        format!("キーワード: {}", search.text),
        format!("カテゴリー: {category}"),
        format!("並び順: {}", search.sort_by.label()),
    ];
    lines.push(String::new());
    if !search.has_searched {
        lines.extend(search_prompt());
        return lines;
    }
    if search.is_loading() {
        lines.push("検索結果".to_string());
        lines.push("検索中...".to_string());
        return lines;
    }
    lines.extend(search_results(store, &search.text, &search.results, now));
    lines
}

/// Shown until a search has run, and for a blank query.
pub fn search_prompt() -> Vec<String> {
    vec![
        "スレッドを検索".to_string(),
        "キーワードを入力して検索ボタンを押してください".to_string(),
    ]
}

/// Result heading, list, and the hints shown when nothing matched.
pub fn search_results(
    store: &Store,
    query: &str,
    results: &[Thread],
    now: DateTime<Utc>,
) -> Vec<String> {
    if results.is_empty() {
        return vec![
            "検索結果".to_string(),
            "検索結果が見つかりません".to_string(),
            "以下をお試しください：".to_string(),
            "・キーワードを変更してみてください".to_string(),
            "・カテゴリーフィルターを解除してみてください".to_string(),
            "・より一般的な用語で検索してみてください".to_string(),
        ];
    }
    let mut lines = vec![
        format!("検索結果（{}件）", format::count(results.len() as u64)),
        format!("「{query}」の検索結果"),
    ];
    lines.extend(result_table(store, results, now));
    lines
}

/// Pinned threads lead; each group keeps the requested sort order.
fn result_table(store: &Store, results: &[Thread], now: DateTime<Utc>) -> Vec<String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Disabled);
    table.set_header(vec!["ID", "タイトル", "投稿者", "閲覧", "投稿", "作成"]);
    for thread in query::pinned_first(results) {
        table.add_row(vec![
            thread.id.to_string(),
            format::truncate(&thread.title, TITLE_WIDTH),
            author_name(store, thread.user_id),
            format::count(thread.view_count),
            thread.post_count.to_string(),
            format::relative_time(thread.created_at, now),
        ]);
    }
    table.to_string().lines().map(String::from).collect()
}

/// Profile page. `viewer` decides whether the edit link is shown.
pub fn profile(
    store: &Store,
    user_id: UserId,
    viewer: Option<UserId>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let Some(user) = store.user(user_id) else {
        return vec![USER_NOT_FOUND.to_string()];
    };

    let own = viewer == Some(user.id);
    let mut lines = profile_header(user, now);
    if own {
        lines.push("[プロフィール編集]".to_string());
    }
    lines.push(String::new());
    lines.push(if own {
        "作成したスレッド".to_string()
    } else {
        format!("{}さんのスレッド", user.name)
    });
    lines.extend(thread_list(store, store.threads_by_user(user.id), now));
    lines
}

fn profile_header(user: &User, now: DateTime<Utc>) -> Vec<String> {
    let mut name = user.name.clone();
    if user.is_admin {
        name.push_str(" [管理者]");
    }
    let mut lines = vec![name];
    if let Some(bio) = &user.bio {
        lines.push(bio.clone());
    }
    if let Some(location) = &user.location {
        lines.push(format!("所在地: {location}"));
    }
    if let Some(website) = &user.website {
        lines.push(format!("ウェブサイト: {website}"));
    }
    lines.push(format!("{}に参加", format::long_date(user.created_at)));
    lines.push(format::last_activity(user.last_activity_at, now));
    let threads = u64::from(user.thread_count);
    let posts = u64::from(user.post_count);
    lines.push(format!(
        "スレッド {}  投稿 {}  総活動 {}",
        format::count(threads),
        format::count(posts),
        format::count(threads + posts)
    ));
    lines
}

fn category(store: &Store, slug: &str, now: DateTime<Utc>) -> Vec<String> {
    let category = store.category_by_slug(slug);
    let mut lines = vec![category.map_or_else(|| "カテゴリー".to_string(), |c| c.name.clone())];
    if let Some(description) = category.and_then(|c| c.description.as_ref()) {
        lines.push(description.clone());
    }
    lines.push(String::new());
    lines.extend(thread_list(store, store.threads_by_category(slug), now));
    lines
}
