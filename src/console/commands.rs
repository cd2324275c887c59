//! Handlers for each menu entry.

use super::{Console, menu::MenuChoice};
use crate::{
    core::input,
    entities::item,
    errors::Result,
    store::RecordStore,
};
use tokio::io::{AsyncBufRead, AsyncWrite};

const FINISH: &str = "finish";

fn describe_item(item: &item::Model) -> String {
    format!(
        "BARCODE: {}\nNAME:    {}\nPRICE:   ${:.2}\nSTOCK:   {}",
        item.barcode, item.name, item.cost, item.stock
    )
}

impl<R, W, S> Console<R, W, S>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: RecordStore,
{
    pub(super) async fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        if choice.needs_admin() && !self.session.require_admin() {
            return self.say("Sorry you must be an admin").await;
        }
        match choice {
            MenuChoice::MemberDetails => self.member_details().await,
            MenuChoice::ItemDetails => self.item_details().await,
            MenuChoice::Buy => self.buy().await,
            MenuChoice::Bill => self.bill().await,
            MenuChoice::AddMember => self.add_member().await,
            MenuChoice::RemoveMember => self.remove_member().await,
            MenuChoice::UpdateAdmin => self.update_admin().await,
            MenuChoice::NewItem => self.new_item().await,
            MenuChoice::ExileItem => self.exile_item().await,
            MenuChoice::ChangeCost => self.change_cost().await,
            MenuChoice::TopUpStock => self.top_up_stock().await,
            MenuChoice::Quit => Ok(()),
        }
    }

    async fn member_details(&mut self) -> Result<()> {
        let member = self.session.current_member();
        let text = format!(
            "ID:     {}\nNAME:   {}\nADMIN:  {}",
            member.id,
            member.name,
            if member.admin { "yes" } else { "no" }
        );
        self.say(&text).await
    }

    async fn item_details(&mut self) -> Result<()> {
        let Some(barcode) = self.prompt("Barcode of item: ").await? else {
            return Ok(());
        };
        if !self.session.inspect_item(&barcode).await? {
            return self.say("Item is not in the database").await;
        }
        let text = describe_item(self.session.current_item());
        self.say(&text).await
    }

    /// Scans until `finish`, then checks out.
    async fn buy(&mut self) -> Result<()> {
        loop {
            let Some(barcode) = self
                .prompt("Scan item (type finish to finalise): ")
                .await?
            else {
                return Ok(());
            };
            if barcode.is_empty() {
                continue;
            }
            if barcode.eq_ignore_ascii_case(FINISH) {
                return self.finish_purchase().await;
            }
            if let Err(err) = self.scan(&barcode).await {
                self.report(err).await?;
            }
        }
    }

    async fn scan(&mut self, barcode: &str) -> Result<()> {
        if !self.session.inspect_item(barcode).await? {
            return self.say("Item not in this TOC's database").await;
        }
        self.session.add_current_item_to_cart()?;
        let item = self.session.current_item();
        let text = format!("{}: ${:.2}", item.name, item.cost);
        self.say(&text).await
    }

    async fn finish_purchase(&mut self) -> Result<()> {
        let scanned = self.session.cart().len();
        let committed = self.session.checkout().await?;

        for transaction in &committed {
            let line = format!(
                "Charged {} - ${:.2}",
                transaction.item_name, transaction.item_cost
            );
            self.say(&line).await?;
        }
        let dropped = scanned.saturating_sub(committed.len());
        if dropped > 0 {
            self.say(&format!(
                "{dropped} item(s) were no longer available and not charged"
            ))
            .await?;
        }
        let total: f64 = committed.iter().map(|t| t.item_cost).sum();
        self.say(&format!(
            "Purchase complete: {} item(s), ${total:.2}",
            committed.len()
        ))
        .await
    }

    async fn bill(&mut self) -> Result<()> {
        let bill = self.session.bill().await?;
        if bill.is_empty() {
            return self.say("No purchases yet").await;
        }
        self.say(&bill.render()).await
    }

    async fn add_member(&mut self) -> Result<()> {
        let Some(id) = self.prompt("Member number of new member: ").await? else {
            return Ok(());
        };
        let id = input::parse_member_id(&id)?;
        let Some(name) = self.prompt("Name of member: ").await? else {
            return Ok(());
        };
        let Some(admin) = self
            .prompt("Is the member an admin (1 for yes, 0 for no): ")
            .await?
        else {
            return Ok(());
        };
        let admin = input::parse_admin_flag(&admin)?;

        let outcome = self.session.create_member(id, &name, admin).await?;
        self.say_outcome(outcome).await
    }

    async fn remove_member(&mut self) -> Result<()> {
        let Some(id) = self.prompt("Member number to remove: ").await? else {
            return Ok(());
        };
        let id = input::parse_member_id(&id)?;

        let outcome = self.session.remove_member(id).await?;
        self.say_outcome(outcome).await
    }

    async fn update_admin(&mut self) -> Result<()> {
        let Some(id) = self.prompt("Member number to update: ").await? else {
            return Ok(());
        };
        let id = input::parse_member_id(&id)?;
        let Some(admin) = self
            .prompt("Should the member be an admin (1 for yes, 0 for no): ")
            .await?
        else {
            return Ok(());
        };
        let admin = input::parse_admin_flag(&admin)?;

        let outcome = self.session.set_admin(id, admin).await?;
        self.say_outcome(outcome).await
    }

    async fn new_item(&mut self) -> Result<()> {
        let Some(barcode) = self.prompt("Barcode of item: ").await? else {
            return Ok(());
        };
        let Some(name) = self.prompt("Name of item: ").await? else {
            return Ok(());
        };
        let Some(cost) = self.prompt("Cost of item: ").await? else {
            return Ok(());
        };
        let cost = input::parse_cost(&cost)?;
        let Some(stock) = self.prompt("Stock of item: ").await? else {
            return Ok(());
        };
        let stock = input::parse_stock(&stock)?;

        let outcome = self
            .session
            .create_item(&barcode, &name, cost, stock)
            .await?;
        self.say_outcome(outcome).await
    }

    async fn exile_item(&mut self) -> Result<()> {
        let Some(barcode) = self.prompt("Barcode of item to remove: ").await? else {
            return Ok(());
        };
        let outcome = self.session.remove_item(&barcode).await?;
        self.say_outcome(outcome).await
    }

    async fn change_cost(&mut self) -> Result<()> {
        let Some(barcode) = self.prompt("Barcode of item to update: ").await? else {
            return Ok(());
        };
        let Some(cost) = self.prompt("Updated cost: ").await? else {
            return Ok(());
        };
        let cost = input::parse_cost(&cost)?;

        let outcome = self.session.update_item_cost(&barcode, cost).await?;
        self.say_outcome(outcome).await
    }

    async fn top_up_stock(&mut self) -> Result<()> {
        let Some(barcode) = self.prompt("Barcode of item to restock: ").await? else {
            return Ok(());
        };
        let Some(stock) = self.prompt("Units now on the shelf: ").await? else {
            return Ok(());
        };
        let stock = input::parse_stock(&stock)?;

        let outcome = self.session.update_item_stock(&barcode, stock).await?;
        self.say_outcome(outcome).await
    }
}
