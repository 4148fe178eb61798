use std::collections::BTreeSet;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use boletera::{
    BackendError, CheckoutError, CheckoutFlow, FixtureBackend, LoadPhase, RaffleStore,
    StoreBackend, TicketCell,
};
use boletera_core::board::CellState;
use boletera_core::pricing::{self, PriceMode, PriceRequest, Quote};
use boletera_core::{Pack, PurchaseIntent, Raffle, RaffleSlug, TicketNumber};

const BOARD_ROW_WIDTH: usize = 10;

#[derive(Parser)]
#[command(name = "boletera-cli", version, about = "Storefront tools for boletera raffles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Show {
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        hide_occupied: bool,
    },
    Pick {
        slug: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, env = "BOLETERA_SEED")]
        seed: Option<String>,
    },
    Quote {
        slug: String,
        #[arg(long)]
        tickets: Option<String>,
        #[arg(long)]
        pack: Option<usize>,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    Checkout {
        slug: String,
        #[arg(long)]
        tickets: Option<String>,
        #[arg(long)]
        pack: Option<usize>,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long, env = "BOLETERA_SEED")]
        seed: Option<String>,
        #[arg(long)]
        reject: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let backend = FixtureBackend::demo()?;

    match cli.command {
        Commands::Show {
            slug,
            page,
            hide_occupied,
        } => run_show(&backend, &slug, page, hide_occupied),
        Commands::Pick {
            slug,
            quantity,
            seed,
        } => run_pick(&backend, &slug, quantity, seed),
        Commands::Quote {
            slug,
            tickets,
            pack,
            quantity,
        } => run_quote(&backend, &slug, tickets, pack, quantity),
        Commands::Checkout {
            slug,
            tickets,
            pack,
            quantity,
            seed,
            reject,
        } => run_checkout(&backend, &slug, tickets, pack, quantity, seed, reject),
    }
}

fn run_show(
    backend: &FixtureBackend,
    slug: &str,
    page: u32,
    hide_occupied: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let slug = RaffleSlug::parse(slug)?;
    let store = mount_store(backend, &slug, None)?;
    if store.snapshot().phase == LoadPhase::NotFound {
        report_unknown_raffle(backend, &slug);
        return Ok(());
    }
    store.set_hide_occupied(hide_occupied);
    store.set_page(page);

    let snapshot = store.snapshot();
    let Some(raffle) = snapshot.raffle.as_ref() else {
        return Ok(());
    };
    println!(
        "{} - ${:.2} per ticket",
        raffle.title, raffle.price_per_ticket
    );
    let taken = raffle.ticket_total - snapshot.available_count;
    let draw = raffle
        .draw_label
        .as_deref()
        .map(|label| format!(" (draw {label})"))
        .unwrap_or_default();
    println!(
        "{} tickets, {} available, {} taken{}",
        raffle.ticket_total, snapshot.available_count, taken, draw
    );
    if snapshot.universe_len() == 0 {
        println!("no tickets to display");
        return Ok(());
    }

    println!("page {}/{}", snapshot.page, snapshot.page_count);
    println!();
    for row in snapshot.page_cells().chunks(BOARD_ROW_WIDTH) {
        let line = row.iter().map(format_cell).collect::<Vec<_>>().join(" ");
        println!("{line}");
    }
    println!();
    println!("legend: 12. available  12+ in selection  12x taken");

    if !raffle.packs.is_empty() {
        println!();
        println!("packs:");
        for (index, pack) in raffle.packs.iter().enumerate() {
            let naive = pack.ticket_count as f64 * raffle.price_per_ticket;
            let saving = naive - pack.price;
            if saving > 0.0 {
                println!(
                    "  [{index}] {}: {} tickets for ${:.2} (save ${:.2})",
                    pack_label(pack),
                    pack.ticket_count,
                    pack.price,
                    saving
                );
            } else {
                println!(
                    "  [{index}] {}: {} tickets for ${:.2}",
                    pack_label(pack),
                    pack.ticket_count,
                    pack.price
                );
            }
        }
    }
    Ok(())
}

fn run_pick(
    backend: &FixtureBackend,
    slug: &str,
    quantity: u32,
    seed: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if quantity == 0 {
        eprintln!("quantity must be at least 1");
        return Ok(());
    }
    let slug = RaffleSlug::parse(slug)?;
    let seed = match seed.as_deref() {
        Some(raw) => Some(parse_seed_arg(raw)?),
        None => None,
    };
    let store = mount_store(backend, &slug, seed)?;
    if store.snapshot().phase == LoadPhase::NotFound {
        report_unknown_raffle(backend, &slug);
        return Ok(());
    }
    store.quick_pick(quantity);

    let snapshot = store.snapshot();
    if let Some(notice) = &snapshot.notice {
        eprintln!("{}", notice.message());
        return Ok(());
    }
    println!("tickets: {}", join_tickets(&snapshot.selection));
    if let (Some(quote), Some(raffle)) = (&snapshot.quote, &snapshot.raffle) {
        print_quote(quote, &raffle.packs);
    }
    Ok(())
}

fn run_quote(
    backend: &FixtureBackend,
    slug: &str,
    tickets: Option<String>,
    pack: Option<usize>,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let slug = RaffleSlug::parse(slug)?;
    let raffle = match backend.fetch_raffle(&slug) {
        Ok(raffle) => raffle,
        Err(BackendError::NotFound) => {
            report_unknown_raffle(backend, &slug);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let request = match (tickets, pack) {
        (Some(_), Some(_)) => {
            eprintln!("choose either --tickets or --pack, not both");
            return Ok(());
        }
        (Some(list), None) => {
            let tickets = parse_ticket_list(&list)?;
            println!(
                "quote for {} tickets: {}",
                tickets.len(),
                join_tickets(&tickets)
            );
            PriceRequest::Tickets {
                count: tickets.len() as u32,
            }
        }
        (None, Some(index)) => {
            let Some(chosen) = raffle.packs.get(index) else {
                report_unknown_pack(&raffle, index);
                return Ok(());
            };
            println!(
                "quote for pack [{index}] {} x{quantity} ({} tickets)",
                pack_label(chosen),
                chosen.ticket_count as u64 * quantity as u64
            );
            PriceRequest::Pack { index, quantity }
        }
        (None, None) => {
            eprintln!("nothing to quote: pass --tickets or --pack");
            return Ok(());
        }
    };

    match pricing::quote(
        request,
        &raffle.packs,
        raffle.price_per_ticket,
        raffle.entries_per_ticket,
    ) {
        Some(quote) => print_quote(&quote, &raffle.packs),
        None => eprintln!("no price for that request"),
    }
    Ok(())
}

fn run_checkout(
    backend: &FixtureBackend,
    slug: &str,
    tickets: Option<String>,
    pack: Option<usize>,
    quantity: u32,
    seed: Option<String>,
    reject: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let slug = RaffleSlug::parse(slug)?;
    let intent = match (tickets, pack) {
        (Some(_), Some(_)) => {
            eprintln!("choose either --tickets or --pack, not both");
            return Ok(());
        }
        (Some(list), None) => PurchaseIntent::Tickets {
            tickets: parse_ticket_list(&list)?,
        },
        (None, Some(index)) => PurchaseIntent::Pack { index, quantity },
        (None, None) => {
            eprintln!("nothing to buy: pass --tickets or --pack");
            return Ok(());
        }
    };

    let query = intent.to_query();
    println!("handoff query: {query}");

    let mut rng = {
        let base_seed = match seed.as_deref() {
            Some(raw) => parse_seed_arg(raw)?,
            None => rand::rng().random(),
        };
        SmallRng::seed_from_u64(base_seed)
    };
    let flow = match CheckoutFlow::begin(backend, &slug, &query, &mut rng) {
        Ok(flow) => flow,
        Err(CheckoutError::Backend(BackendError::NotFound)) => {
            report_unknown_raffle(backend, &slug);
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            return Ok(());
        }
    };

    println!("tickets: {}", join_tickets(flow.tickets()));
    print_quote(flow.quote(), &flow.raffle().packs);

    if reject {
        backend.prime_rejection("simulated backend rejection");
    }
    match flow.submit(backend) {
        Ok(order) => println!(
            "order {} confirmed: {} tickets for ${:.2}",
            order.id,
            order.tickets.len(),
            order.total
        ),
        Err(err) => {
            eprintln!("{err}");
            println!(
                "selection preserved for retry: {}",
                join_tickets(flow.tickets())
            );
        }
    }
    Ok(())
}

/// Loads one raffle view the way the storefront does: begin the load, fetch,
/// apply against the load generation.
fn mount_store(
    backend: &FixtureBackend,
    slug: &RaffleSlug,
    seed: Option<u64>,
) -> Result<Rc<RaffleStore>, Box<dyn std::error::Error>> {
    let store = match seed {
        Some(seed) => RaffleStore::with_seed(seed),
        None => RaffleStore::new(),
    };
    let generation = store.begin_load();
    match backend.fetch_raffle(slug) {
        Ok(raffle) => {
            let occupancy = backend.fetch_occupied(&raffle.id)?;
            store.apply_loaded(generation, raffle, occupancy);
        }
        Err(BackendError::NotFound) => {
            store.apply_not_found(generation);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(store)
}

fn report_unknown_raffle(backend: &FixtureBackend, slug: &RaffleSlug) {
    eprintln!("unknown raffle: {slug}");
    eprintln!("available raffles:");
    for raffle in backend.raffles() {
        eprintln!("  {} ({})", raffle.slug, raffle.title);
    }
}

fn report_unknown_pack(raffle: &Raffle, index: usize) {
    eprintln!("pack {index} is not in this raffle's catalog");
    eprintln!("available packs:");
    for (index, pack) in raffle.packs.iter().enumerate() {
        eprintln!(
            "  [{index}] {} ({} tickets, ${:.2})",
            pack_label(pack),
            pack.ticket_count,
            pack.price
        );
    }
}

fn print_quote(quote: &Quote, packs: &[Pack]) {
    match quote.mode {
        PriceMode::Individual => println!(
            "total: ${:.2} (${:.2} per ticket)",
            quote.total, quote.unit_equivalent_price
        ),
        PriceMode::AutoMatched { pack_index } => match quote.displayed_savings() {
            Some(savings) => println!(
                "total: ${:.2} ({} applied automatically, save ${:.2})",
                quote.total,
                pack_label(&packs[pack_index]),
                savings
            ),
            None => println!(
                "total: ${:.2} ({} applied automatically)",
                quote.total,
                pack_label(&packs[pack_index])
            ),
        },
        PriceMode::ExplicitPack {
            pack_index,
            quantity,
        } => println!(
            "total: ${:.2} ({} x{quantity}, ${:.2} per ticket)",
            quote.total,
            pack_label(&packs[pack_index]),
            quote.unit_equivalent_price
        ),
    }
    if quote.entries_per_ticket > 1 {
        println!(
            "entries: {} ({} per purchased ticket, {} bonus)",
            quote.total_entries,
            quote.entries_per_ticket,
            quote.bonus_entries()
        );
    }
}

fn format_cell(cell: &TicketCell) -> String {
    let glyph = match cell.state {
        CellState::Available => '.',
        CellState::Selected => '+',
        CellState::Occupied => 'x',
    };
    format!("{:>5}{}", cell.ticket, glyph)
}

fn pack_label(pack: &Pack) -> String {
    match &pack.name {
        Some(name) => name.clone(),
        None => format!("{}-ticket pack", pack.ticket_count),
    }
}

fn join_tickets(tickets: &[TicketNumber]) -> String {
    tickets
        .iter()
        .map(|ticket| ticket.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_ticket_list(raw: &str) -> Result<Vec<TicketNumber>, Box<dyn std::error::Error>> {
    let mut tickets = BTreeSet::new();
    for item in raw.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let ticket: TicketNumber = item.parse()?;
        if ticket == 0 {
            return Err("ticket numbers start at 1".into());
        }
        tickets.insert(ticket);
    }
    if tickets.is_empty() {
        return Err("ticket list is empty".into());
    }
    Ok(tickets.into_iter().collect())
}

fn parse_seed_arg(raw: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u64>()?
    };
    Ok(value)
}
