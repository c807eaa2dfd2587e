use std::sync::Arc;

use clan_quiz_bot::config::BotConfig;
use clan_quiz_bot::quiz::icon::{CachedIconRenderer, IconRenderer, SvgBadgeRenderer};
use clan_quiz_bot::quiz::{Clan, QuizSession, ReferenceData};
use dotenv::dotenv;
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{InputFile, KeyboardButton, KeyboardMarkup},
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type BadgeRenderer = CachedIconRenderer<SvgBadgeRenderer>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    ReceiveQuestionCount,
    InQuiz {
        session: QuizSession,
    },
    Finished {
        session: QuizSession,
    },
}

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv().is_ok();

    pretty_env_logger::init();
    log::info!("Starting clan quiz bot...");
    if !dotenv_loaded {
        log::info!("No .env file found, using the process environment");
    }

    if let Err(err) = run().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> HandlerResult {
    let config = BotConfig::from_env()?;

    let data = Arc::new(config.load_reference_data()?);
    log::info!(
        "Reference data loaded: {} clans, {} questions",
        data.clans().len(),
        data.question_bank().len()
    );

    let renderer: Arc<BadgeRenderer> =
        Arc::new(CachedIconRenderer::new(SvgBadgeRenderer, config.icon_cache_ttl));

    let bot = Bot::new(config.token.clone());
    let config = Arc::new(config);

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(
                dptree::filter_map(|msg: Message| msg.text().and_then(parse_clan_command))
                    .endpoint(clan_command),
            )
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveQuestionCount].endpoint(receive_question_count))
            .branch(dptree::case![State::InQuiz { session }].endpoint(receive_answer))
            .branch(dptree::case![State::Finished { session }].endpoint(finished)),
    )
    .dependencies(dptree::deps![
        InMemStorage::<State>::new(),
        data,
        renderer,
        config
    ])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

const GREETING_TEXT: &str = "Hi! Which Warriors clan would you belong to? Answer a few questions and find out. How many questions would you like?";
const RETAKE_QUIZ: &str = "Retake quiz";
const CHANGE_LENGTH: &str = "Change number of questions";
const CLANS_HINT: &str =
    "Send /regenerate to redraw every badge, or /regenerate <clan id> to redraw one.";

/// Gallery commands, answered in any dialogue state without changing it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClanCommand {
    Show,
    Regenerate(Option<String>),
}

fn parse_clan_command(text: &str) -> Option<ClanCommand> {
    let mut words = text.split_whitespace();
    let command = words.next()?;
    // Group chats append the bot's username: /clans@some_bot
    let command = command.split('@').next().unwrap_or(command);
    match command {
        "/clans" => Some(ClanCommand::Show),
        "/regenerate" => Some(ClanCommand::Regenerate(words.next().map(str::to_string))),
        _ => None,
    }
}

fn question_count_keyboard(default_count: usize) -> KeyboardMarkup {
    let mut counts = vec![3, 5, default_count];
    counts.sort_unstable();
    counts.dedup();
    KeyboardMarkup::new(vec![counts
        .into_iter()
        .map(|count| KeyboardButton::new(count.to_string()))
        .collect::<Vec<_>>()])
}

async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    config: Arc<BotConfig>,
) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT)
        .reply_markup(question_count_keyboard(config.question_count))
        .await?;

    dialogue.update(State::ReceiveQuestionCount).await?;
    Ok(())
}

async fn receive_question_count(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    data: Arc<ReferenceData>,
) -> HandlerResult {
    let amount = match msg.text().and_then(|text| text.trim().parse::<usize>().ok()) {
        Some(amount) => amount,
        None => {
            bot.send_message(msg.chat.id, "Please send a number").await?;
            return Ok(());
        }
    };

    let session = match QuizSession::new(data, amount) {
        Ok(session) => session,
        Err(err) => {
            bot.send_message(msg.chat.id, err.to_string()).await?;
            return Ok(());
        }
    };
    if session.len() < amount {
        bot.send_message(
            msg.chat.id,
            format!("There are only {} questions, so you get all of them!", session.len()),
        )
        .await?;
    }

    ask_question(&bot, msg.chat.id, &session).await?;
    dialogue.update(State::InQuiz { session }).await?;
    Ok(())
}

async fn ask_question(bot: &Bot, chat_id: ChatId, session: &QuizSession) -> HandlerResult {
    let question = match session.current_question() {
        Some(question) => question,
        None => return Ok(()),
    };

    let mut text = format!(
        "Question {} of {} ({}%)\n\n{}",
        session.position() + 1,
        session.len(),
        session.progress_percent(),
        question.text
    );
    if let Some(tint) = session.tint() {
        if let Some(clan) = session.data().clan_by_id(&tint.clan_id) {
            text.push_str(&format!(
                "\n\nLeaning toward {} {} (background {})",
                clan.emoji,
                clan.name,
                tint.background(session.data())
            ));
        }
    }

    let answers = session
        .current_display_answers()
        .iter()
        .map(|answer| vec![KeyboardButton::new(answer.text.clone())])
        .collect::<Vec<_>>();

    bot.send_message(chat_id, text)
        .reply_markup(KeyboardMarkup::new(answers))
        .await?;
    Ok(())
}

async fn receive_answer(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: QuizSession,
    msg: Message,
    renderer: Arc<BadgeRenderer>,
) -> HandlerResult {
    let question_id = session.current_question().map(|question| question.id.clone());
    let picked = msg.text().and_then(|text| {
        session
            .current_display_answers()
            .iter()
            .find(|answer| answer.text == text)
            .map(|answer| answer.id.clone())
    });

    if let (Some(question_id), Some(answer_id)) = (question_id, picked) {
        if let Err(err) = session.select_answer(&question_id, &answer_id) {
            log::warn!("Answer rejected: {}", err);
            bot.send_message(msg.chat.id, "That answer doesn't belong to this question")
                .await?;
            return Ok(());
        }
        session.advance();
    } else if !session.is_complete() {
        bot.send_message(msg.chat.id, "Please choose one of the answers on the keyboard")
            .await?;
        return Ok(());
    }

    if session.is_complete() {
        // Store the finished session before anything else can fail
        dialogue
            .update(State::Finished {
                session: session.clone(),
            })
            .await?;
        send_result(&bot, msg.chat.id, &session, renderer.as_ref()).await?;
    } else {
        ask_question(&bot, msg.chat.id, &session).await?;
        dialogue.update(State::InQuiz { session }).await?;
    }
    Ok(())
}

async fn send_result(
    bot: &Bot,
    chat_id: ChatId,
    session: &QuizSession,
    renderer: &BadgeRenderer,
) -> HandlerResult {
    let result = match session.result() {
        Some(result) => result,
        None => return Ok(()),
    };
    let clan = &result.winning_clan;

    let mut text = format!(
        "You are {} {}!\n{}% match ({} out of {} questions)\n\n{}\n\nTraits: {}\nCharacteristics: {}\n\nScore breakdown:",
        clan.emoji,
        clan.name,
        result.match_percent(),
        result.winning_score(),
        result.total_questions,
        clan.description,
        clan.traits.join(", "),
        clan.characteristics.join(", ")
    );
    for row in result.breakdown(session.data()) {
        text.push_str(&format!(
            "\n{} {}: {} ({}%)",
            row.clan.emoji, row.clan.name, row.score, row.percent
        ));
    }
    bot.send_message(chat_id, text).await?;

    // The badge is a nice extra; the result stands without it
    send_badge(bot, chat_id, clan, renderer, format!("Your {} badge", clan.name)).await?;

    let keyboard = KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(RETAKE_QUIZ),
        KeyboardButton::new(CHANGE_LENGTH),
    ]]);
    bot.send_message(chat_id, result.share_text())
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

async fn send_badge(
    bot: &Bot,
    chat_id: ChatId,
    clan: &Clan,
    renderer: &BadgeRenderer,
    caption: String,
) -> HandlerResult {
    match renderer.render(&clan.id, clan.color) {
        Ok(icon) => {
            let badge = InputFile::memory(icon.into_bytes()).file_name(format!("{}.svg", clan.id));
            if let Err(err) = bot.send_document(chat_id, badge).caption(caption).await {
                log::warn!("Failed to send badge for {}: {}", clan.id, err);
            }
        }
        Err(err) => {
            log::warn!("Badge rendering failed for {}: {}", clan.id, err);
            bot.send_message(chat_id, format!("{} (badge unavailable)", clan.emoji))
                .await?;
        }
    }
    Ok(())
}

async fn clan_command(
    bot: Bot,
    msg: Message,
    command: ClanCommand,
    data: Arc<ReferenceData>,
    renderer: Arc<BadgeRenderer>,
) -> HandlerResult {
    let clans: Vec<&Clan> = match &command {
        ClanCommand::Show => data.clans().iter().collect(),
        ClanCommand::Regenerate(None) => {
            renderer.invalidate_all();
            log::info!("All clan badges invalidated");
            data.clans().iter().collect()
        }
        ClanCommand::Regenerate(Some(clan_id)) => match data.clan_by_id(clan_id) {
            Some(clan) => {
                renderer.invalidate(&clan.id);
                log::info!("Badge for {} invalidated", clan.id);
                vec![clan]
            }
            None => {
                bot.send_message(msg.chat.id, format!("There is no clan called {}", clan_id))
                    .await?;
                return Ok(());
            }
        },
    };

    for clan in clans {
        let caption = format!(
            "{} {}\nTraits: {}\n\n{}",
            clan.emoji,
            clan.name,
            clan.traits.join(", "),
            clan.description
        );
        send_badge(&bot, msg.chat.id, clan, renderer.as_ref(), caption).await?;
    }
    if command == ClanCommand::Show {
        bot.send_message(msg.chat.id, CLANS_HINT).await?;
    }
    Ok(())
}

async fn finished(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: QuizSession,
    msg: Message,
    config: Arc<BotConfig>,
) -> HandlerResult {
    match msg.text() {
        Some(RETAKE_QUIZ) => {
            session.reset();
            ask_question(&bot, msg.chat.id, &session).await?;
            dialogue.update(State::InQuiz { session }).await?;
        }
        Some(CHANGE_LENGTH) => {
            bot.send_message(msg.chat.id, "How many questions would you like?")
                .reply_markup(question_count_keyboard(config.question_count))
                .await?;
            dialogue.update(State::ReceiveQuestionCount).await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Please choose one of the options")
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gallery_commands() {
        assert_eq!(parse_clan_command("/clans"), Some(ClanCommand::Show));
        assert_eq!(parse_clan_command("/clans@warriors_bot"), Some(ClanCommand::Show));
        assert_eq!(parse_clan_command("/regenerate"), Some(ClanCommand::Regenerate(None)));
        assert_eq!(
            parse_clan_command("/regenerate  riverclan"),
            Some(ClanCommand::Regenerate(Some("riverclan".to_string())))
        );
    }

    #[test]
    fn answers_are_not_gallery_commands() {
        assert_eq!(parse_clan_command("Retake quiz"), None);
        assert_eq!(parse_clan_command("5"), None);
        assert_eq!(parse_clan_command(""), None);
        assert_eq!(parse_clan_command("/start"), None);
    }
}
